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
    isentropic::{p0_over_p, t0_over_t},
    require_gamma, require_supersonic,
};
use log::trace;
use numerics::{bisect, expand_bracket, require_finite, Error, Result, SolverConfig};
use std::f64::consts::FRAC_PI_2;

fn nu(mach: f64, gamma: f64) -> f64 {
    let k = ((gamma + 1.0) / (gamma - 1.0)).sqrt();
    let s = (mach * mach - 1.0).sqrt();
    k * (s / k).atan() - s.atan()
}

fn nu_max(gamma: f64) -> f64 {
    FRAC_PI_2 * (((gamma + 1.0) / (gamma - 1.0)).sqrt() - 1.0)
}

/// Prandtl-Meyer function: the angle, in radians, through which a sonic
/// flow must turn to reach Mach `mach`.
pub fn prandtl_meyer_angle(mach: f64, gamma: f64) -> Result<f64> {
    let mach = require_supersonic("Mach number", mach)?;
    Ok(nu(mach, require_gamma(gamma)?))
}

/// Limit of the Prandtl-Meyer function as Mach goes to infinity.
pub fn max_prandtl_meyer_angle(gamma: f64) -> Result<f64> {
    Ok(nu_max(require_gamma(gamma)?))
}

pub fn mach_from_prandtl_meyer_angle(nu_target: f64, gamma: f64, config: &SolverConfig) -> Result<f64> {
    let gamma = require_gamma(gamma)?;
    let target = require_finite("Prandtl-Meyer angle", nu_target)?;
    let limit = nu_max(gamma);
    if target < 0.0 || target >= limit {
        return Err(Error::Domain(format!(
            "Prandtl-Meyer angle {} rad is outside [0, {}) rad",
            target, limit
        )));
    }
    if target == 0.0 {
        return Ok(1.0);
    }

    let residual = move |mach: f64| Ok(nu(mach, gamma) - target);
    let (inner, outer) = expand_bracket(residual, 1.0, 2.0, 2.0, config)?;
    bisect(residual, inner, outer, config)
}

/// A centered expansion fan turning the flow away from itself by `theta`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrandtlMeyerExpansion {
    m1: f64,
    theta: f64,
    gamma: f64,
    nu1: f64,
    nu2: f64,
    mu1: f64,
    mu2: f64,
    m2: f64,
    p2_over_p1: f64,
    t2_over_t1: f64,
    rho2_over_rho1: f64,
}

impl PrandtlMeyerExpansion {
    pub fn new(m1: f64, theta: f64, gamma: f64, config: &SolverConfig) -> Result<Self> {
        let m1 = require_supersonic("upstream Mach number", m1)?;
        let gamma = require_gamma(gamma)?;
        let theta = require_finite("turning angle", theta)?;
        if theta < 0.0 {
            return Err(Error::Domain(format!(
                "expansion turning angle cannot be negative, got {}",
                theta
            )));
        }

        let nu1 = nu(m1, gamma);
        let limit = nu_max(gamma);
        if theta >= limit - nu1 {
            return Err(Error::Domain(format!(
                "turning {} rad from M1 = {} exceeds the vacuum limit of {} rad",
                theta,
                m1,
                limit - nu1
            )));
        }
        let nu2 = nu1 + theta;
        let m2 = if theta == 0.0 {
            m1
        } else {
            mach_from_prandtl_meyer_angle(nu2, gamma, config)?
        };
        trace!("expansion M1 = {} through {} rad gives M2 = {}", m1, theta, m2);

        let p2_over_p1 = p0_over_p(m1, gamma) / p0_over_p(m2, gamma);
        let t2_over_t1 = t0_over_t(m1, gamma) / t0_over_t(m2, gamma);
        Ok(Self {
            m1,
            theta,
            gamma,
            nu1,
            nu2,
            mu1: (1.0 / m1).asin(),
            mu2: (1.0 / m2).asin(),
            m2,
            p2_over_p1,
            t2_over_t1,
            rho2_over_rho1: p2_over_p1 / t2_over_t1,
        })
    }

    pub fn m1(&self) -> f64 {
        self.m1
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn nu1(&self) -> f64 {
        self.nu1
    }

    pub fn nu2(&self) -> f64 {
        self.nu2
    }

    /// Angle of the leading Mach line of the fan.
    pub fn mu1(&self) -> f64 {
        self.mu1
    }

    /// Angle of the trailing Mach line of the fan.
    pub fn mu2(&self) -> f64 {
        self.mu2
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    pub fn p2_over_p1(&self) -> f64 {
        self.p2_over_p1
    }

    pub fn t2_over_t1(&self) -> f64 {
        self.t2_over_t1
    }

    pub fn rho2_over_rho1(&self) -> f64 {
        self.rho2_over_rho1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prandtl_meyer_angle() {
        assert_eq!(prandtl_meyer_angle(1.0, 1.4).unwrap(), 0.0);
        assert_relative_eq!(
            prandtl_meyer_angle(2.0, 1.4).unwrap().to_degrees(),
            26.379_76,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            prandtl_meyer_angle(3.0, 1.4).unwrap().to_degrees(),
            49.757_35,
            epsilon = 1e-5
        );
        assert!(prandtl_meyer_angle(0.9, 1.4).unwrap_err().is_domain());
    }

    #[test]
    fn test_max_angle() {
        assert_relative_eq!(
            max_prandtl_meyer_angle(1.4).unwrap().to_degrees(),
            130.454_08,
            epsilon = 1e-5
        );
        assert!(max_prandtl_meyer_angle(1.0)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_inverse() {
        let config = SolverConfig::default();
        for mach in [1.0, 1.2, 2.0, 4.5, 20.0] {
            let angle = prandtl_meyer_angle(mach, 1.4).unwrap();
            let found = mach_from_prandtl_meyer_angle(angle, 1.4, &config).unwrap();
            assert_relative_eq!(found, mach, max_relative = 1e-7);
        }
        let limit = max_prandtl_meyer_angle(1.4).unwrap();
        assert!(mach_from_prandtl_meyer_angle(limit, 1.4, &config)
            .unwrap_err()
            .is_domain());
        assert!(mach_from_prandtl_meyer_angle(-0.1, 1.4, &config)
            .unwrap_err()
            .is_domain());
    }

    #[test]
    fn test_expansion_mach_2_ten_degrees() {
        let config = SolverConfig::default();
        let fan = PrandtlMeyerExpansion::new(2.0, 10f64.to_radians(), 1.4, &config).unwrap();
        assert_relative_eq!(fan.m2(), 2.384_887, epsilon = 1e-6);
        assert_relative_eq!(fan.p2_over_p1(), 0.547_969, epsilon = 1e-5);
        assert_relative_eq!(fan.t2_over_t1(), 0.842_091, epsilon = 1e-5);
        assert_relative_eq!(fan.rho2_over_rho1(), 0.650_724, epsilon = 1e-5);
        assert_relative_eq!(fan.nu2() - fan.nu1(), 10f64.to_radians(), epsilon = 1e-12);
        assert!(fan.mu2() < fan.mu1());
    }

    #[test]
    fn test_expansion_without_turning() {
        let fan = PrandtlMeyerExpansion::new(2.0, 0.0, 1.4, &SolverConfig::default()).unwrap();
        assert_eq!(fan.m2(), 2.0);
        assert_eq!(fan.p2_over_p1(), 1.0);
    }

    #[test]
    fn test_expansion_limits() {
        let config = SolverConfig::default();
        assert!(PrandtlMeyerExpansion::new(2.0, 2.0, 1.4, &config)
            .unwrap_err()
            .is_domain());
        assert!(PrandtlMeyerExpansion::new(2.0, -0.1, 1.4, &config)
            .unwrap_err()
            .is_domain());
        assert!(PrandtlMeyerExpansion::new(0.5, 0.1, 1.4, &config)
            .unwrap_err()
            .is_domain());
    }
}
