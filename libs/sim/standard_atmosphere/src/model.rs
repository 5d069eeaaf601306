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
use log::{debug, trace};
use numerics::{bisect, require_finite, Error, Result, SolverConfig};
use physical_constants::{
    geometric_to_geopotential, geopotential_to_geometric, StandardAtmosphere, GAMMA_AIR, R_AIR,
    STANDARD_ATMOSPHERE,
};
use rayon::prelude::*;

/// State of the standard atmosphere at one altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereProperties {
    geopotential_altitude: f64,
    temperature: f64,
    pressure: f64,
    density: f64,
}

impl AtmosphereProperties {
    /// m
    pub fn geopotential_altitude(&self) -> f64 {
        self.geopotential_altitude
    }

    /// m
    pub fn geometric_altitude(&self) -> f64 {
        geopotential_to_geometric(self.geopotential_altitude)
    }

    /// K
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Pa
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// kg/m^3
    pub fn density(&self) -> f64 {
        self.density
    }

    /// m/s, for dry air.
    pub fn speed_of_sound(&self) -> f64 {
        (GAMMA_AIR * R_AIR * self.temperature).sqrt()
    }
}

/// Closed-form evaluation of the layered atmosphere and its inverses.
#[derive(Clone, Copy, Debug)]
pub struct AtmosphereModel {
    table: &'static StandardAtmosphere,
    config: SolverConfig,
}

impl Default for AtmosphereModel {
    fn default() -> Self {
        Self {
            table: &STANDARD_ATMOSPHERE,
            config: SolverConfig::default(),
        }
    }
}

impl AtmosphereModel {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: &STANDARD_ATMOSPHERE,
            config,
        })
    }

    pub fn table(&self) -> &StandardAtmosphere {
        self.table
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Properties at geometric altitude `z` (m above mean sea level).
    pub fn properties_at_altitude(&self, z: f64) -> Result<AtmosphereProperties> {
        require_finite("altitude", z)?;
        // Bound z before converting; the conversion overflows far outside the model.
        let floor = geopotential_to_geometric(self.table.floor());
        let ceiling = geopotential_to_geometric(self.table.ceiling());
        if z < floor || z > ceiling {
            return Err(Error::Domain(format!(
                "geometric altitude {} m is outside [{}, {}] m",
                z, floor, ceiling
            )));
        }
        let h = geometric_to_geopotential(z).clamp(self.table.floor(), self.table.ceiling());
        self.properties_at_geopotential(h)
    }

    /// Properties at geopotential altitude `h`.
    pub fn properties_at_geopotential(&self, h: f64) -> Result<AtmosphereProperties> {
        require_finite("geopotential altitude", h)?;
        let layer = self.table.layer_for(h).ok_or_else(|| {
            Error::Domain(format!(
                "geopotential altitude {} m is outside [{}, {}] m",
                h,
                self.table.floor(),
                self.table.ceiling()
            ))
        })?;
        let temperature = layer.temperature_at(h);
        let pressure = layer.pressure_at(h);
        Ok(AtmosphereProperties {
            geopotential_altitude: h,
            temperature,
            pressure,
            density: pressure / (R_AIR * temperature),
        })
    }

    /// Invert the strictly decreasing pressure profile.
    pub fn altitude_from_pressure(&self, pressure: f64) -> Result<AtmosphereProperties> {
        self.invert("pressure", pressure, AtmosphereProperties::pressure)
    }

    /// Invert the strictly decreasing density profile.
    pub fn altitude_from_density(&self, density: f64) -> Result<AtmosphereProperties> {
        self.invert("density", density, AtmosphereProperties::density)
    }

    /// Invert whichever of `pressure` or `density` is given. Exactly one of
    /// the two is required.
    pub fn altitude_from(
        &self,
        pressure: Option<f64>,
        density: Option<f64>,
    ) -> Result<AtmosphereProperties> {
        match (pressure, density) {
            (Some(pressure), None) => self.altitude_from_pressure(pressure),
            (None, Some(density)) => self.altitude_from_density(density),
            (Some(_), Some(_)) => Err(Error::InvalidArgument(
                "give either pressure or density, not both".to_owned(),
            )),
            (None, None) => Err(Error::InvalidArgument(
                "one of pressure or density is required".to_owned(),
            )),
        }
    }

    /// Equivalent airspeed, the sea level speed with the same dynamic pressure,
    /// of a true airspeed `tas` (m/s) flown at geometric altitude `z`.
    pub fn true_to_equivalent_airspeed(&self, tas: f64, z: f64) -> Result<f64> {
        let tas = require_airspeed("true airspeed", tas)?;
        Ok(tas * self.density_ratio(z)?.sqrt())
    }

    /// True airspeed of an equivalent airspeed `eas` (m/s) at geometric altitude `z`.
    pub fn equivalent_to_true_airspeed(&self, eas: f64, z: f64) -> Result<f64> {
        let eas = require_airspeed("equivalent airspeed", eas)?;
        Ok(eas / self.density_ratio(z)?.sqrt())
    }

    // rho(z) / rho0
    fn density_ratio(&self, z: f64) -> Result<f64> {
        let sea_level = self.properties_at_geopotential(self.table.floor())?;
        Ok(self.properties_at_altitude(z)?.density() / sea_level.density())
    }

    /// Evaluate many geometric altitudes at once. Each element behaves exactly
    /// like `properties_at_altitude`, including its error.
    pub fn properties_at_altitudes(&self, altitudes: &[f64]) -> Vec<Result<AtmosphereProperties>> {
        altitudes
            .par_iter()
            .map(|&z| self.properties_at_altitude(z))
            .collect()
    }

    fn invert(
        &self,
        name: &str,
        target: f64,
        quantity: fn(&AtmosphereProperties) -> f64,
    ) -> Result<AtmosphereProperties> {
        require_finite(name, target)?;
        let bottom = self.properties_at_geopotential(self.table.floor())?;
        let top = self.properties_at_geopotential(self.table.ceiling())?;
        let (highest, lowest) = (quantity(&bottom), quantity(&top));
        if target > highest || target < lowest {
            return Err(Error::Domain(format!(
                "{} {} is outside the modeled range [{}, {}]",
                name, target, lowest, highest
            )));
        }
        if target == highest {
            return Ok(bottom);
        }
        if target == lowest {
            return Ok(top);
        }

        let h = bisect(
            |h| Ok(quantity(&self.properties_at_geopotential(h)?) - target),
            self.table.floor(),
            self.table.ceiling(),
            &self.config,
        )?;
        trace!("{} {} found at geopotential altitude {} m", name, target, h);
        let found = self.properties_at_geopotential(h)?;
        debug!(
            "inverted {} {} to {} m (residual {})",
            name,
            target,
            h,
            quantity(&found) - target
        );
        Ok(found)
    }
}

fn require_airspeed(name: &str, speed: f64) -> Result<f64> {
    let speed = require_finite(name, speed)?;
    if speed < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "{} cannot be negative, got {} m/s",
            name, speed
        )));
    }
    Ok(speed)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_sea_level() {
        let props = AtmosphereModel::default()
            .properties_at_altitude(0.0)
            .unwrap();
        assert_eq!(props.geopotential_altitude(), 0.0);
        assert_eq!(props.temperature(), 288.15);
        assert_eq!(props.pressure(), 101_325.0);
        assert_relative_eq!(props.density(), 1.225, epsilon = 1e-3);
        assert_relative_eq!(props.speed_of_sound(), 340.29, epsilon = 1e-2);
    }

    #[test]
    fn test_one_kilometer() {
        let props = AtmosphereModel::default()
            .properties_at_altitude(1_000.0)
            .unwrap();
        assert_relative_eq!(props.geopotential_altitude(), 999.843, epsilon = 1e-3);
        assert_relative_eq!(props.temperature(), 281.651, epsilon = 1e-3);
        assert_relative_eq!(props.pressure(), 89_874.6, max_relative = 1e-4);
        assert_relative_eq!(props.density(), 1.1117, epsilon = 1e-4);
        assert_relative_eq!(props.geometric_altitude(), 1_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_upper_layers() {
        let model = AtmosphereModel::default();
        let props = model.properties_at_geopotential(25_000.0).unwrap();
        assert_relative_eq!(props.temperature(), 221.65, epsilon = 1e-9);
        assert_relative_eq!(props.pressure(), 2_511.0, max_relative = 1e-3);
        let props = model.properties_at_geopotential(86_000.0).unwrap();
        assert_relative_eq!(props.temperature(), 184.65, epsilon = 1e-9);
    }

    #[test]
    fn test_domain() {
        let model = AtmosphereModel::default();
        assert!(model.properties_at_altitude(-0.5).unwrap_err().is_domain());
        assert!(model
            .properties_at_geopotential(86_000.5)
            .unwrap_err()
            .is_domain());
        assert!(model
            .properties_at_altitude(f64::NAN)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_overflowing_altitude_is_out_of_domain() {
        let model = AtmosphereModel::default();
        assert!(model.properties_at_altitude(1e303).unwrap_err().is_domain());
        assert!(model
            .properties_at_altitude(-6_356_766.0)
            .unwrap_err()
            .is_domain());
        assert!(model.properties_at_altitude(f64::MAX).unwrap_err().is_domain());
        assert!(model
            .properties_at_altitude(f64::INFINITY)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_geometric_ceiling_is_in_domain() {
        let model = AtmosphereModel::default();
        let ceiling = geopotential_to_geometric(86_000.0);
        let props = model.properties_at_altitude(ceiling).unwrap();
        assert_relative_eq!(props.geopotential_altitude(), 86_000.0, epsilon = 1e-6);
        assert!(model
            .properties_at_altitude(ceiling + 1.0)
            .unwrap_err()
            .is_domain());
    }

    #[test]
    fn test_equivalent_airspeed() {
        let model = AtmosphereModel::default();
        assert_eq!(model.true_to_equivalent_airspeed(100.0, 0.0).unwrap(), 100.0);
        // sqrt(rho(10 km) / rho0) = sqrt(0.413510 / 1.224999)
        let eas = model.true_to_equivalent_airspeed(250.0, 10_000.0).unwrap();
        assert_relative_eq!(eas, 250.0 * 0.580_999, max_relative = 1e-5);
        assert!(eas < 250.0);
    }

    #[test]
    fn test_airspeed_round_trip() {
        let model = AtmosphereModel::default();
        for z in [0.0, 3_000.0, 11_000.0, 40_000.0, 80_000.0] {
            for tas in [0.0, 50.0, 680.0] {
                let eas = model.true_to_equivalent_airspeed(tas, z).unwrap();
                let back = model.equivalent_to_true_airspeed(eas, z).unwrap();
                assert_relative_eq!(back, tas, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_airspeed_rejects_bad_input() {
        let model = AtmosphereModel::default();
        assert!(model
            .true_to_equivalent_airspeed(-1.0, 0.0)
            .unwrap_err()
            .is_invalid_argument());
        assert!(model
            .equivalent_to_true_airspeed(f64::NAN, 0.0)
            .unwrap_err()
            .is_invalid_argument());
        assert!(model
            .true_to_equivalent_airspeed(100.0, 100_000.0)
            .unwrap_err()
            .is_domain());
    }

    #[test]
    fn test_invert_endpoints() {
        let model = AtmosphereModel::default();
        let props = model.altitude_from_pressure(101_325.0).unwrap();
        assert_eq!(props.geopotential_altitude(), 0.0);
        let top = model.properties_at_geopotential(86_000.0).unwrap();
        let props = model.altitude_from_density(top.density()).unwrap();
        assert_eq!(props.geopotential_altitude(), 86_000.0);
    }

    #[test]
    fn test_invert_out_of_range() {
        let model = AtmosphereModel::default();
        assert!(model.altitude_from_pressure(110_000.0).unwrap_err().is_domain());
        assert!(model.altitude_from_pressure(0.01).unwrap_err().is_domain());
        assert!(model.altitude_from_density(2.0).unwrap_err().is_domain());
        assert!(model.altitude_from_density(-1.0).unwrap_err().is_domain());
    }

    #[test]
    fn test_invert_tropopause() {
        let model = AtmosphereModel::default();
        let props = model.altitude_from_pressure(22_632.06).unwrap();
        assert_abs_diff_eq!(props.geopotential_altitude(), 11_000.0, epsilon = 1e-2);
    }

    #[test]
    fn test_invert_exhausted_budget() {
        let config = SolverConfig::default().with_max_iterations(10).unwrap();
        let model = AtmosphereModel::new(config).unwrap();
        assert!(model
            .altitude_from_pressure(50_000.0)
            .unwrap_err()
            .is_convergence());
    }

    #[test]
    fn test_batch_matches_scalar() {
        let model = AtmosphereModel::default();
        let altitudes = [0.0, 5_000.0, -10.0, 47_000.0, 90_000.0];
        let batch = model.properties_at_altitudes(&altitudes);
        assert_eq!(batch.len(), altitudes.len());
        for (z, result) in altitudes.iter().zip(batch) {
            assert_eq!(result, model.properties_at_altitude(*z));
        }
    }
}
