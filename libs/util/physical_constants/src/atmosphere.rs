// This file is part of Aerodyne.
//
// Aerodyne is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Aerodyne is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Aerodyne.  If not, see <http://www.gnu.org/licenses/>.
use crate::{
    ATMOSPHERE_CEILING, EARTH_RADIUS, R_AIR, SEA_LEVEL_PRESSURE, SEA_LEVEL_TEMPERATURE,
    STANDARD_GRAVITY,
};

// Geopotential base altitude (m) and lapse rate (K/m) of each layer,
// troposphere through the upper mesosphere.
const US_1976_LAYERS: [(f64, f64); 7] = [
    (0.0, -0.006_5),
    (11_000.0, 0.0),
    (20_000.0, 0.001),
    (32_000.0, 0.002_8),
    (47_000.0, 0.0),
    (51_000.0, -0.002_8),
    (71_000.0, -0.002),
];

/// Convert geometric altitude above mean sea level to geopotential altitude.
pub fn geometric_to_geopotential(z: f64) -> f64 {
    EARTH_RADIUS * z / (EARTH_RADIUS + z)
}

/// Convert geopotential altitude back to geometric altitude.
pub fn geopotential_to_geometric(h: f64) -> f64 {
    EARTH_RADIUS * h / (EARTH_RADIUS - h)
}

/// One constant-lapse-rate band of the standard atmosphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphericLayer {
    base_altitude: f64,
    base_temperature: f64,
    lapse_rate: f64,
    base_pressure: f64,
}

impl AtmosphericLayer {
    /// Geopotential altitude of the bottom of the layer, m.
    pub fn base_altitude(&self) -> f64 {
        self.base_altitude
    }

    /// K
    pub fn base_temperature(&self) -> f64 {
        self.base_temperature
    }

    /// K/m of geopotential altitude; zero for isothermal layers.
    pub fn lapse_rate(&self) -> f64 {
        self.lapse_rate
    }

    /// Pa
    pub fn base_pressure(&self) -> f64 {
        self.base_pressure
    }

    pub fn is_isothermal(&self) -> bool {
        self.lapse_rate == 0.0
    }

    pub fn temperature_at(&self, h: f64) -> f64 {
        self.base_temperature + self.lapse_rate * (h - self.base_altitude)
    }

    /// Hydrostatic pressure at geopotential altitude `h` within this layer.
    pub fn pressure_at(&self, h: f64) -> f64 {
        if self.is_isothermal() {
            self.base_pressure
                * (-STANDARD_GRAVITY * (h - self.base_altitude) / (R_AIR * self.base_temperature))
                    .exp()
        } else {
            let temperature = self.temperature_at(h);
            self.base_pressure
                * (temperature / self.base_temperature)
                    .powf(-STANDARD_GRAVITY / (self.lapse_rate * R_AIR))
        }
    }
}

/// The layered reference atmosphere, sorted by base altitude.
///
/// Base temperatures and pressures are not tabulated: each one is carried up
/// from the layer below, so temperature and pressure are continuous at every
/// boundary no matter how the lapse rates are edited.
#[derive(Clone, Debug)]
pub struct StandardAtmosphere {
    layers: Vec<AtmosphericLayer>,
    ceiling: f64,
}

impl StandardAtmosphere {
    pub fn us_1976() -> Self {
        Self::from_lapse_rates(
            &US_1976_LAYERS,
            SEA_LEVEL_TEMPERATURE,
            SEA_LEVEL_PRESSURE,
            ATMOSPHERE_CEILING,
        )
    }

    fn from_lapse_rates(
        bands: &[(f64, f64)],
        surface_temperature: f64,
        surface_pressure: f64,
        ceiling: f64,
    ) -> Self {
        assert!(!bands.is_empty(), "an atmosphere needs at least one layer");
        assert!(
            bands.windows(2).all(|pair| pair[0].0 < pair[1].0),
            "layers must be strictly ascending by base altitude"
        );
        assert!(bands[bands.len() - 1].0 < ceiling);

        let mut layers: Vec<AtmosphericLayer> = Vec::with_capacity(bands.len());
        for &(base_altitude, lapse_rate) in bands {
            let (base_temperature, base_pressure) = match layers.last() {
                Some(below) => (
                    below.temperature_at(base_altitude),
                    below.pressure_at(base_altitude),
                ),
                None => (surface_temperature, surface_pressure),
            };
            layers.push(AtmosphericLayer {
                base_altitude,
                base_temperature,
                lapse_rate,
                base_pressure,
            });
        }

        Self { layers, ceiling }
    }

    pub fn layers(&self) -> &[AtmosphericLayer] {
        &self.layers
    }

    /// Lowest modeled geopotential altitude, m.
    pub fn floor(&self) -> f64 {
        self.layers[0].base_altitude
    }

    /// Highest modeled geopotential altitude, m.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn contains(&self, h: f64) -> bool {
        h >= self.floor() && h <= self.ceiling
    }

    /// The last layer whose base does not exceed `h`; an altitude exactly on
    /// a boundary belongs to the layer that starts there.
    pub fn layer_for(&self, h: f64) -> Option<&AtmosphericLayer> {
        if !self.contains(h) {
            return None;
        }
        let above = self.layers.partition_point(|layer| layer.base_altitude <= h);
        self.layers.get(above - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layers_sorted_and_contiguous() {
        let atmosphere = StandardAtmosphere::us_1976();
        let layers = atmosphere.layers();
        assert_eq!(layers.len(), 7);
        assert_eq!(atmosphere.floor(), 0.0);
        assert_eq!(atmosphere.ceiling(), 86_000.0);
        for pair in layers.windows(2) {
            assert!(pair[0].base_altitude() < pair[1].base_altitude());
        }
    }

    #[test]
    fn test_layer_continuity() {
        let atmosphere = StandardAtmosphere::us_1976();
        for pair in atmosphere.layers().windows(2) {
            let boundary = pair[1].base_altitude();
            assert_relative_eq!(pair[0].temperature_at(boundary), pair[1].base_temperature());
            assert_relative_eq!(pair[0].pressure_at(boundary), pair[1].base_pressure());
        }
    }

    #[test]
    fn test_reference_base_values() {
        let atmosphere = StandardAtmosphere::us_1976();
        let expect = [
            (288.15, 101_325.0),
            (216.65, 22_632.06),
            (216.65, 5_474.889),
            (228.65, 868.018_7),
            (270.65, 110.906_3),
            (270.65, 66.938_87),
            (214.65, 3.956_420),
        ];
        for (layer, (temperature, pressure)) in atmosphere.layers().iter().zip(expect) {
            assert_relative_eq!(layer.base_temperature(), temperature, epsilon = 1e-9);
            assert_relative_eq!(layer.base_pressure(), pressure, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_layer_lookup() {
        let atmosphere = StandardAtmosphere::us_1976();
        let base = |h: f64| atmosphere.layer_for(h).map(|layer| layer.base_altitude());
        assert_eq!(base(0.0), Some(0.0));
        assert_eq!(base(10_999.9), Some(0.0));
        assert_eq!(base(11_000.0), Some(11_000.0));
        assert_eq!(base(50_000.0), Some(47_000.0));
        assert_eq!(base(71_000.0), Some(71_000.0));
        assert_eq!(base(86_000.0), Some(71_000.0));
        assert_eq!(base(-0.1), None);
        assert_eq!(base(86_000.1), None);
        assert_eq!(base(f64::NAN), None);
    }

    #[test]
    fn test_geopotential_conversion() {
        assert_eq!(geometric_to_geopotential(0.0), 0.0);
        assert_relative_eq!(
            geometric_to_geopotential(1_000.0),
            999.842_7,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            geometric_to_geopotential(86_000.0),
            84_852.05,
            epsilon = 1e-2
        );
        for z in [0.0, 500.0, 11_019.0, 50_000.0, 86_000.0] {
            assert_relative_eq!(
                geopotential_to_geometric(geometric_to_geopotential(z)),
                z,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_isothermal_layer_pressure() {
        let atmosphere = StandardAtmosphere::us_1976();
        let tropopause = atmosphere.layer_for(15_000.0).unwrap();
        assert!(tropopause.is_isothermal());
        assert_relative_eq!(tropopause.temperature_at(15_000.0), 216.65, epsilon = 1e-9);
        assert_relative_eq!(
            tropopause.pressure_at(15_000.0),
            12_044.57,
            max_relative = 1e-4
        );
    }
}
