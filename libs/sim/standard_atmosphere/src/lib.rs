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
mod model;

pub use crate::model::{AtmosphereModel, AtmosphereProperties};

use numerics::Result;

/// Standard atmosphere at a geometric altitude in meters.
pub fn atmosphere_properties(altitude_m: f64) -> Result<AtmosphereProperties> {
    AtmosphereModel::default().properties_at_altitude(altitude_m)
}

/// Standard atmosphere at the altitude where either `pressure` (Pa) or
/// `density` (kg/m^3) is found. Exactly one of the two must be given.
pub fn atmosphere_altitude(
    pressure: Option<f64>,
    density: Option<f64>,
) -> Result<AtmosphereProperties> {
    AtmosphereModel::default().altitude_from(pressure, density)
}

/// Equivalent airspeed (m/s) of true airspeed `tas` at a geometric altitude.
pub fn true_to_equivalent_airspeed(tas: f64, altitude_m: f64) -> Result<f64> {
    AtmosphereModel::default().true_to_equivalent_airspeed(tas, altitude_m)
}

/// True airspeed (m/s) of equivalent airspeed `eas` at a geometric altitude.
pub fn equivalent_to_true_airspeed(eas: f64, altitude_m: f64) -> Result<f64> {
    AtmosphereModel::default().equivalent_to_true_airspeed(eas, altitude_m)
}
