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

// Notation follows the usual gas dynamics convention: `x0` is a stagnation
// quantity, `x1` upstream of a wave, `x2` downstream, and `a_over_b` a ratio.
mod expansion;
mod isentropic;
mod shocks;

pub use crate::{
    expansion::{
        mach_from_prandtl_meyer_angle, max_prandtl_meyer_angle, prandtl_meyer_angle,
        PrandtlMeyerExpansion,
    },
    isentropic::{
        mach_angle, mach_from_area_ratio, mach_from_pressure_ratio, FlowBranch, GasState,
        IsentropicRatios,
    },
    shocks::{deflection_angle, max_deflection, NormalShock, ObliqueShock, ShockBranch},
};

use numerics::{require_finite, Error, Result, SolverConfig};

pub use physical_constants::{GAMMA_AIR as DEFAULT_GAMMA, R_AIR};

/// Speed of sound `sqrt(gamma * R * T)` in m/s for temperature `T` in K.
pub fn speed_of_sound(temperature: f64, gamma: f64, r_gas: f64) -> Result<f64> {
    let gamma = require_gamma(gamma)?;
    let r_gas = require_finite("gas constant", r_gas)?;
    if r_gas <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "gas constant must be positive, got {}",
            r_gas
        )));
    }
    let temperature = require_finite("temperature", temperature)?;
    if temperature < 0.0 {
        return Err(Error::Domain(format!(
            "absolute temperature cannot be negative, got {} K",
            temperature
        )));
    }
    Ok((gamma * r_gas * temperature).sqrt())
}

/// Stagnation to static ratios at Mach `mach`.
pub fn isentropic_ratios(mach: f64, gamma: f64) -> Result<IsentropicRatios> {
    GasState::new(mach, gamma)?.ratios()
}

/// Jump conditions across a normal shock with upstream Mach `m1`.
pub fn normal_shock(m1: f64, gamma: f64) -> Result<NormalShock> {
    NormalShock::new(m1, gamma)
}

/// Attached oblique shock turning a Mach `m1` flow by `theta` radians.
pub fn oblique_shock(m1: f64, theta: f64, gamma: f64, branch: ShockBranch) -> Result<ObliqueShock> {
    ObliqueShock::from_deflection(m1, theta, gamma, branch, &SolverConfig::default())
}

/// Isentropic expansion turning a Mach `m1` flow by `theta` radians.
pub fn prandtl_meyer_expansion(m1: f64, theta: f64, gamma: f64) -> Result<PrandtlMeyerExpansion> {
    PrandtlMeyerExpansion::new(m1, theta, gamma, &SolverConfig::default())
}

pub(crate) fn require_gamma(gamma: f64) -> Result<f64> {
    if gamma.is_finite() && gamma > 1.0 {
        Ok(gamma)
    } else {
        Err(Error::InvalidArgument(format!(
            "ratio of specific heats must be finite and above 1, got {}",
            gamma
        )))
    }
}

pub(crate) fn require_mach(name: &str, mach: f64) -> Result<f64> {
    let mach = require_finite(name, mach)?;
    if mach < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "{} cannot be negative, got {}",
            name, mach
        )));
    }
    Ok(mach)
}

/// Upstream Mach number of a shock or expansion: valid, and at least sonic.
pub(crate) fn require_supersonic(name: &str, mach: f64) -> Result<f64> {
    let mach = require_mach(name, mach)?;
    if mach < 1.0 {
        return Err(Error::Domain(format!(
            "{} must be at least 1, got {}",
            name, mach
        )));
    }
    Ok(mach)
}
