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
mod atmosphere;

pub use atmosphere::{
    geometric_to_geopotential, geopotential_to_geometric, AtmosphericLayer, StandardAtmosphere,
};

use once_cell::sync::Lazy;

/// m/s^2
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Effective Earth radius used for geopotential conversion, m.
pub const EARTH_RADIUS: f64 = 6_356_766.0;

/// Specific gas constant for dry air, J/(kg K).
pub const R_AIR: f64 = 287.053;

/// Ratio of specific heats for diatomic air.
pub const GAMMA_AIR: f64 = 1.4;

/// K
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15;

/// Pa
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

/// Top of the modeled atmosphere, m geopotential.
pub const ATMOSPHERE_CEILING: f64 = 86_000.0;

pub static STANDARD_ATMOSPHERE: Lazy<StandardAtmosphere> = Lazy::new(StandardAtmosphere::us_1976);
