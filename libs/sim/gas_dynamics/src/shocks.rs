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
    isentropic::{p0_over_p, rho0_over_rho},
    require_gamma, require_supersonic,
};
use log::{debug, trace};
use numerics::{bisect, maximize, require_finite, Error, Result, SolverConfig};
use std::{f64::consts::FRAC_PI_2, fmt};

/// The two attached solutions of the theta-beta-M relation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShockBranch {
    /// Shallower wave angle; usually supersonic downstream.
    Weak,
    /// Steeper wave angle; always subsonic downstream.
    Strong,
}

impl Default for ShockBranch {
    fn default() -> Self {
        Self::Weak
    }
}

impl fmt::Display for ShockBranch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

// Rankine-Hugoniot jump for the shock-normal Mach component.
#[derive(Clone, Copy, Debug)]
struct Jump {
    m2: f64,
    p2_over_p1: f64,
    rho2_over_rho1: f64,
    t2_over_t1: f64,
    p02_over_p01: f64,
    rho02_over_rho01: f64,
}

impl Jump {
    fn across(m1: f64, gamma: f64) -> Self {
        let m1_sq = m1 * m1;
        let m2 = ((1.0 + 0.5 * (gamma - 1.0) * m1_sq) / (gamma * m1_sq - 0.5 * (gamma - 1.0)))
            .sqrt();
        let p2_over_p1 = 1.0 + 2.0 * gamma / (gamma + 1.0) * (m1_sq - 1.0);
        let rho2_over_rho1 = (gamma + 1.0) * m1_sq / ((gamma - 1.0) * m1_sq + 2.0);
        Self {
            m2,
            p2_over_p1,
            rho2_over_rho1,
            t2_over_t1: p2_over_p1 / rho2_over_rho1,
            p02_over_p01: p0_over_p(m2, gamma) / p0_over_p(m1, gamma) * p2_over_p1,
            rho02_over_rho01: rho0_over_rho(m2, gamma) / rho0_over_rho(m1, gamma)
                * rho2_over_rho1,
        }
    }

    // Adiabatic, so one up to rounding.
    fn t02_over_t01(&self) -> f64 {
        self.p02_over_p01 / self.rho02_over_rho01
    }
}

/// Jump conditions across a shock normal to the flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalShock {
    m1: f64,
    gamma: f64,
    m2: f64,
    p2_over_p1: f64,
    rho2_over_rho1: f64,
    t2_over_t1: f64,
    p02_over_p01: f64,
    rho02_over_rho01: f64,
    t02_over_t01: f64,
}

impl NormalShock {
    pub fn new(m1: f64, gamma: f64) -> Result<Self> {
        let m1 = require_supersonic("upstream Mach number", m1)?;
        let gamma = require_gamma(gamma)?;
        let jump = Jump::across(m1, gamma);
        Ok(Self {
            m1,
            gamma,
            m2: jump.m2,
            p2_over_p1: jump.p2_over_p1,
            rho2_over_rho1: jump.rho2_over_rho1,
            t2_over_t1: jump.t2_over_t1,
            p02_over_p01: jump.p02_over_p01,
            rho02_over_rho01: jump.rho02_over_rho01,
            t02_over_t01: jump.t02_over_t01(),
        })
    }

    pub fn m1(&self) -> f64 {
        self.m1
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    pub fn p2_over_p1(&self) -> f64 {
        self.p2_over_p1
    }

    pub fn rho2_over_rho1(&self) -> f64 {
        self.rho2_over_rho1
    }

    pub fn t2_over_t1(&self) -> f64 {
        self.t2_over_t1
    }

    /// Total pressure recovery; never above one.
    pub fn p02_over_p01(&self) -> f64 {
        self.p02_over_p01
    }

    pub fn rho02_over_rho01(&self) -> f64 {
        self.rho02_over_rho01
    }

    pub fn t02_over_t01(&self) -> f64 {
        self.t02_over_t01
    }
}

// theta-beta-M, pinned to exactly zero at both ends of [mu, pi/2].
fn flow_deflection(m1: f64, beta: f64, gamma: f64) -> f64 {
    if beta == FRAC_PI_2 || beta <= (1.0 / m1).asin() {
        return 0.0;
    }
    let m1_sq = m1 * m1;
    let numerator = 2.0 / beta.tan() * (m1_sq * beta.sin().powi(2) - 1.0);
    let denominator = m1_sq * (gamma + (2.0 * beta).cos()) + 2.0;
    (numerator / denominator).atan()
}

/// Flow turning angle behind a shock inclined at `beta` radians.
pub fn deflection_angle(m1: f64, beta: f64, gamma: f64) -> Result<f64> {
    let m1 = require_supersonic("upstream Mach number", m1)?;
    let gamma = require_gamma(gamma)?;
    let beta = require_finite("wave angle", beta)?;
    let mu = (1.0 / m1).asin();
    if beta < mu || beta > FRAC_PI_2 {
        return Err(Error::Domain(format!(
            "wave angle {} rad is outside [{}, {}] for M1 = {}",
            beta, mu, FRAC_PI_2, m1
        )));
    }
    Ok(flow_deflection(m1, beta, gamma))
}

/// Largest deflection an attached shock can produce: `(theta_max, beta)`.
pub fn max_deflection(m1: f64, gamma: f64, config: &SolverConfig) -> Result<(f64, f64)> {
    let m1 = require_supersonic("upstream Mach number", m1)?;
    let gamma = require_gamma(gamma)?;
    if m1 == 1.0 {
        return Ok((0.0, FRAC_PI_2));
    }
    let mu = (1.0 / m1).asin();
    let (beta, theta) = maximize(|beta| flow_deflection(m1, beta, gamma), mu, FRAC_PI_2, config)?;
    trace!("M1 = {}: theta_max {} at beta {}", m1, theta, beta);
    Ok((theta, beta))
}

/// An attached plane oblique shock and the state behind it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObliqueShock {
    m1: f64,
    theta: f64,
    beta: f64,
    gamma: f64,
    branch: Option<ShockBranch>,
    m1n: f64,
    m2n: f64,
    m2: f64,
    p2_over_p1: f64,
    rho2_over_rho1: f64,
    t2_over_t1: f64,
    p02_over_p01: f64,
    rho02_over_rho01: f64,
    t02_over_t01: f64,
}

impl ObliqueShock {
    /// Solve for the wave angle that turns the flow by `theta` radians.
    ///
    /// A deflection of zero degenerates to the normal shock on either branch.
    /// The other zero-deflection root, the Mach wave, is
    /// `ObliqueShock::from_wave_angle(m1, mach_angle(m1)?, gamma)`.
    /// At or beyond the maximum deflection no attached shock exists and the
    /// result is `Error::Domain`.
    pub fn from_deflection(
        m1: f64,
        theta: f64,
        gamma: f64,
        branch: ShockBranch,
        config: &SolverConfig,
    ) -> Result<Self> {
        let m1 = require_supersonic("upstream Mach number", m1)?;
        let gamma = require_gamma(gamma)?;
        let theta = require_finite("deflection angle", theta)?;
        if theta < 0.0 {
            return Err(Error::Domain(format!(
                "deflection angle cannot be negative, got {}",
                theta
            )));
        }
        if theta == 0.0 {
            debug!("zero deflection at M1 = {} taken as a normal shock", m1);
            return Ok(Self::solve(m1, FRAC_PI_2, 0.0, gamma, Some(branch)));
        }

        let (theta_max, beta_max) = max_deflection(m1, gamma, config)?;
        if theta >= theta_max {
            debug!(
                "detached shock: theta {} >= theta_max {} at M1 = {}",
                theta, theta_max, m1
            );
            return Err(Error::Domain(format!(
                "deflection {} rad exceeds the attached limit {} rad for M1 = {}",
                theta, theta_max, m1
            )));
        }

        let mu = (1.0 / m1).asin();
        let residual = |beta: f64| Ok(flow_deflection(m1, beta, gamma) - theta);
        let beta = match branch {
            ShockBranch::Weak => bisect(residual, mu, beta_max, config)?,
            ShockBranch::Strong => bisect(residual, beta_max, FRAC_PI_2, config)?,
        };
        trace!("M1 = {}, theta = {}: {} beta {}", m1, theta, branch, beta);
        Ok(Self::solve(m1, beta, theta, gamma, Some(branch)))
    }

    /// Build the shock from a known wave angle in `[mu, pi/2]`.
    pub fn from_wave_angle(m1: f64, beta: f64, gamma: f64) -> Result<Self> {
        let theta = deflection_angle(m1, beta, gamma)?;
        Ok(Self::solve(m1, beta, theta, gamma, None))
    }

    fn solve(m1: f64, beta: f64, theta: f64, gamma: f64, branch: Option<ShockBranch>) -> Self {
        let m1n = m1 * beta.sin();
        let jump = Jump::across(m1n, gamma);
        Self {
            m1,
            theta,
            beta,
            gamma,
            branch,
            m1n,
            m2n: jump.m2,
            m2: jump.m2 / (beta - theta).sin(),
            p2_over_p1: jump.p2_over_p1,
            rho2_over_rho1: jump.rho2_over_rho1,
            t2_over_t1: jump.t2_over_t1,
            p02_over_p01: jump.p02_over_p01,
            rho02_over_rho01: jump.rho02_over_rho01,
            t02_over_t01: jump.t02_over_t01(),
        }
    }

    pub fn m1(&self) -> f64 {
        self.m1
    }

    /// Flow deflection, rad.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Wave angle, rad.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// The branch that was requested, if the shock was solved from a deflection.
    pub fn branch(&self) -> Option<ShockBranch> {
        self.branch
    }

    pub fn m1n(&self) -> f64 {
        self.m1n
    }

    pub fn m2n(&self) -> f64 {
        self.m2n
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    pub fn p2_over_p1(&self) -> f64 {
        self.p2_over_p1
    }

    pub fn rho2_over_rho1(&self) -> f64 {
        self.rho2_over_rho1
    }

    pub fn t2_over_t1(&self) -> f64 {
        self.t2_over_t1
    }

    pub fn p02_over_p01(&self) -> f64 {
        self.p02_over_p01
    }

    pub fn rho02_over_rho01(&self) -> f64 {
        self.rho02_over_rho01
    }

    pub fn t02_over_t01(&self) -> f64 {
        self.t02_over_t01
    }
}
