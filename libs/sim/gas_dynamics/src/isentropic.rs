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
use crate::{require_gamma, require_mach, require_supersonic};
use log::trace;
use numerics::{bisect, expand_bracket, require_finite, Error, Result, SolverConfig};
use physical_constants::GAMMA_AIR;
use std::fmt;

/// Which side of the sonic throat an area ratio is inverted on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlowBranch {
    Subsonic,
    Supersonic,
}

impl fmt::Display for FlowBranch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Subsonic => write!(f, "subsonic"),
            Self::Supersonic => write!(f, "supersonic"),
        }
    }
}

/// Stagnation to static ratios, and the area ratio, at one Mach number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsentropicRatios {
    t0_over_t: f64,
    p0_over_p: f64,
    rho0_over_rho: f64,
    area_ratio: f64,
}

impl IsentropicRatios {
    /// Stagnation over static temperature.
    pub fn t0_over_t(&self) -> f64 {
        self.t0_over_t
    }

    /// Stagnation over static pressure.
    pub fn p0_over_p(&self) -> f64 {
        self.p0_over_p
    }

    /// Stagnation over static density.
    pub fn rho0_over_rho(&self) -> f64 {
        self.rho0_over_rho
    }

    /// Duct area over sonic throat area, A/A*.
    pub fn area_ratio(&self) -> f64 {
        self.area_ratio
    }
}

/// A calorically perfect gas moving at a given Mach number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasState {
    mach: f64,
    gamma: f64,
}

impl GasState {
    pub fn new(mach: f64, gamma: f64) -> Result<Self> {
        Ok(Self {
            mach: require_mach("Mach number", mach)?,
            gamma: require_gamma(gamma)?,
        })
    }

    pub fn air(mach: f64) -> Result<Self> {
        Self::new(mach, GAMMA_AIR)
    }

    pub fn mach(&self) -> f64 {
        self.mach
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn t0_over_t(&self) -> f64 {
        t0_over_t(self.mach, self.gamma)
    }

    pub fn p0_over_p(&self) -> f64 {
        p0_over_p(self.mach, self.gamma)
    }

    pub fn rho0_over_rho(&self) -> f64 {
        rho0_over_rho(self.mach, self.gamma)
    }

    pub fn a0_over_a(&self) -> f64 {
        self.t0_over_t().sqrt()
    }

    /// Duct area over sonic throat area, A/A*. Unbounded at rest.
    pub fn area_ratio(&self) -> Result<f64> {
        if self.mach == 0.0 {
            return Err(Error::Domain(
                "area ratio is unbounded at Mach 0".to_owned(),
            ));
        }
        Ok(area_ratio(self.mach, self.gamma))
    }

    pub fn ratios(&self) -> Result<IsentropicRatios> {
        Ok(IsentropicRatios {
            t0_over_t: self.t0_over_t(),
            p0_over_p: self.p0_over_p(),
            rho0_over_rho: self.rho0_over_rho(),
            area_ratio: self.area_ratio()?,
        })
    }
}

pub(crate) fn t0_over_t(mach: f64, gamma: f64) -> f64 {
    1.0 + 0.5 * (gamma - 1.0) * mach * mach
}

pub(crate) fn p0_over_p(mach: f64, gamma: f64) -> f64 {
    t0_over_t(mach, gamma).powf(gamma / (gamma - 1.0))
}

pub(crate) fn rho0_over_rho(mach: f64, gamma: f64) -> f64 {
    t0_over_t(mach, gamma).powf(1.0 / (gamma - 1.0))
}

fn area_ratio(mach: f64, gamma: f64) -> f64 {
    let exponent = (gamma + 1.0) / (2.0 * (gamma - 1.0));
    (2.0 / (gamma + 1.0) * t0_over_t(mach, gamma)).powf(exponent) / mach
}

/// Angle of the Mach cone, `asin(1/M)`.
pub fn mach_angle(mach: f64) -> Result<f64> {
    Ok((1.0 / require_supersonic("Mach number", mach)?).asin())
}

/// Mach number on the requested branch at which A/A* equals `area_ratio`.
pub fn mach_from_area_ratio(
    area_ratio_target: f64,
    gamma: f64,
    branch: FlowBranch,
    config: &SolverConfig,
) -> Result<f64> {
    let gamma = require_gamma(gamma)?;
    let target = require_finite("area ratio", area_ratio_target)?;
    if target < 1.0 {
        return Err(Error::Domain(format!(
            "area ratio cannot be below the sonic minimum of 1, got {}",
            target
        )));
    }
    if target == 1.0 {
        return Ok(1.0);
    }

    // A/A* falls toward 1 from both sides of M = 1, so each branch is
    // monotonic and bracketed by stepping away from the throat.
    let residual = move |mach: f64| Ok(area_ratio(mach, gamma) - target);
    let (inner, outer) = match branch {
        FlowBranch::Subsonic => expand_bracket(residual, 1.0, 0.5, 0.5, config)?,
        FlowBranch::Supersonic => expand_bracket(residual, 1.0, 2.0, 2.0, config)?,
    };
    let mach = bisect(residual, inner, outer, config)?;
    trace!("A/A* = {} gives {} Mach {}", target, branch, mach);
    Ok(mach)
}

/// Invert the closed form stagnation pressure ratio p0/p.
pub fn mach_from_pressure_ratio(p0_over_p: f64, gamma: f64) -> Result<f64> {
    let gamma = require_gamma(gamma)?;
    let ratio = require_finite("pressure ratio", p0_over_p)?;
    if ratio < 1.0 {
        return Err(Error::Domain(format!(
            "stagnation pressure cannot be below static pressure, got p0/p = {}",
            ratio
        )));
    }
    Ok((2.0 / (gamma - 1.0) * (ratio.powf((gamma - 1.0) / gamma) - 1.0)).sqrt())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    // Reference values from NACA 1135, gamma = 1.4.
    #[test]
    fn test_pressure_ratio() {
        let expect = [
            (0.0, 1.0),
            (0.27, 0.950_6),
            (0.89, 0.597_7),
            (1.0, 0.528_3),
            (1.30, 0.360_9),
            (2.05, 0.118_2),
        ];
        for (mach, p_over_p0) in expect {
            let state = GasState::air(mach).unwrap();
            assert_relative_eq!(1.0 / state.p0_over_p(), p_over_p0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_area_ratio() {
        let expect = [
            (0.38, 1.658_7),
            (0.79, 1.042_5),
            (1.0, 1.0),
            (1.24, 1.043),
            (2.14, 1.902),
        ];
        for (mach, area) in expect {
            let state = GasState::air(mach).unwrap();
            assert_relative_eq!(state.area_ratio().unwrap(), area, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_sonic_ratios() {
        let ratios = GasState::air(1.0).unwrap().ratios().unwrap();
        assert_relative_eq!(ratios.t0_over_t(), 1.2);
        assert_relative_eq!(ratios.p0_over_p(), 1.892_929, epsilon = 1e-6);
        assert_relative_eq!(ratios.rho0_over_rho(), 1.577_441, epsilon = 1e-6);
        assert_relative_eq!(ratios.area_ratio(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_at_rest() {
        let state = GasState::air(0.0).unwrap();
        assert_eq!(state.t0_over_t(), 1.0);
        assert_eq!(state.p0_over_p(), 1.0);
        assert_eq!(state.a0_over_a(), 1.0);
        assert!(state.area_ratio().unwrap_err().is_domain());
        assert!(state.ratios().unwrap_err().is_domain());
    }

    #[test]
    fn test_invalid_state() {
        assert!(GasState::air(-1.0).unwrap_err().is_invalid_argument());
        assert!(GasState::new(2.0, 1.0).unwrap_err().is_invalid_argument());
        assert!(GasState::new(2.0, 0.5).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_mach_angle() {
        assert_relative_eq!(mach_angle(2.0).unwrap(), std::f64::consts::FRAC_PI_6);
        assert_relative_eq!(mach_angle(1.0).unwrap(), std::f64::consts::FRAC_PI_2);
        assert!(mach_angle(0.5).unwrap_err().is_domain());
    }

    #[test]
    fn test_mach_from_area_ratio_both_branches() {
        let config = SolverConfig::default();
        let subsonic = mach_from_area_ratio(1.658_7, 1.4, FlowBranch::Subsonic, &config).unwrap();
        assert_relative_eq!(subsonic, 0.38, epsilon = 1e-4);
        let supersonic =
            mach_from_area_ratio(1.902, 1.4, FlowBranch::Supersonic, &config).unwrap();
        assert_relative_eq!(supersonic, 2.14, epsilon = 1e-3);
    }

    #[test]
    fn test_mach_from_area_ratio_round_trip() {
        let config = SolverConfig::default();
        for mach in [0.01, 0.2, 0.5, 0.99, 1.01, 1.5, 3.0, 10.0] {
            let ratio = GasState::air(mach).unwrap().area_ratio().unwrap();
            let branch = if mach < 1.0 {
                FlowBranch::Subsonic
            } else {
                FlowBranch::Supersonic
            };
            let found = mach_from_area_ratio(ratio, 1.4, branch, &config).unwrap();
            assert_relative_eq!(found, mach, max_relative = 1e-7);
        }
    }

    #[test]
    fn test_mach_from_area_ratio_edges() {
        let config = SolverConfig::default();
        assert_eq!(
            mach_from_area_ratio(1.0, 1.4, FlowBranch::Subsonic, &config),
            Ok(1.0)
        );
        assert_eq!(
            mach_from_area_ratio(1.0, 1.4, FlowBranch::Supersonic, &config),
            Ok(1.0)
        );
        assert!(
            mach_from_area_ratio(0.9, 1.4, FlowBranch::Supersonic, &config)
                .unwrap_err()
                .is_domain()
        );
        assert!(
            mach_from_area_ratio(2.0, 1.0, FlowBranch::Subsonic, &config)
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn test_mach_from_pressure_ratio() {
        for mach in [0.0, 0.3, 1.0, 2.5] {
            let ratio = GasState::air(mach).unwrap().p0_over_p();
            assert_relative_eq!(
                mach_from_pressure_ratio(ratio, 1.4).unwrap(),
                mach,
                epsilon = 1e-9
            );
        }
        assert!(mach_from_pressure_ratio(0.5, 1.4).unwrap_err().is_domain());
    }
}
