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
use anyhow::Result;
use gas_dynamics::{
    mach_from_area_ratio, max_deflection, FlowBranch, GasState, NormalShock, ObliqueShock,
    PrandtlMeyerExpansion, ShockBranch, DEFAULT_GAMMA,
};
use log::debug;
use numerics::SolverConfig;
use standard_atmosphere::{AtmosphereModel, AtmosphereProperties};
use structopt::{clap::AppSettings, StructOpt};

/// Standard atmosphere and compressible flow calculator
#[derive(Debug, StructOpt)]
#[structopt(global_settings = &[AppSettings::AllowNegativeNumbers])]
struct Opt {
    /// Relative tolerance of the iterative solvers
    #[structopt(long, global = true, default_value = "1e-9")]
    tolerance: f64,

    /// Iteration budget of the iterative solvers
    #[structopt(long = "max-iterations", global = true, default_value = "100")]
    max_iterations: usize,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Standard atmosphere at a geometric altitude in meters
    Atmosphere { altitude: f64 },

    /// Altitude at which a pressure (Pa) or density (kg/m^3) occurs
    Altitude {
        #[structopt(long)]
        pressure: Option<f64>,

        #[structopt(long)]
        density: Option<f64>,
    },

    /// Stagnation to static ratios at a Mach number
    Isentropic {
        mach: f64,

        #[structopt(long, default_value = "1.4")]
        gamma: f64,
    },

    /// Mach number at which a duct reaches an area ratio A/A*
    AreaRatio {
        ratio: f64,

        /// Solve on the supersonic side of the throat
        #[structopt(long)]
        supersonic: bool,

        #[structopt(long, default_value = "1.4")]
        gamma: f64,
    },

    /// Jump conditions across a normal shock
    NormalShock {
        mach: f64,

        #[structopt(long, default_value = "1.4")]
        gamma: f64,
    },

    /// Attached oblique shock for a deflection in degrees
    ObliqueShock {
        mach: f64,

        theta_deg: f64,

        /// Report the strong shock solution instead of the weak one
        #[structopt(long)]
        strong: bool,

        #[structopt(long, default_value = "1.4")]
        gamma: f64,
    },

    /// Convert a true airspeed (m/s) at a geometric altitude to equivalent airspeed
    Airspeed {
        speed: f64,

        altitude: f64,

        /// Treat the speed as equivalent airspeed and report true airspeed
        #[structopt(long)]
        equivalent: bool,
    },

    /// Prandtl-Meyer expansion through a turning angle in degrees
    Expansion {
        mach: f64,

        theta_deg: f64,

        #[structopt(long, default_value = "1.4")]
        gamma: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let config = SolverConfig::default()
        .with_relative_tolerance(opt.tolerance)?
        .with_max_iterations(opt.max_iterations)?;
    debug!("solving with {:?}", config);
    run(opt.command, &config)
}

fn run(command: Command, config: &SolverConfig) -> Result<()> {
    match command {
        Command::Atmosphere { altitude } => {
            let model = AtmosphereModel::new(*config)?;
            report_atmosphere(&model.properties_at_altitude(altitude)?);
        }
        Command::Altitude { pressure, density } => {
            let model = AtmosphereModel::new(*config)?;
            report_atmosphere(&model.altitude_from(pressure, density)?);
        }
        Command::Airspeed {
            speed,
            altitude,
            equivalent,
        } => {
            let model = AtmosphereModel::new(*config)?;
            if equivalent {
                let tas = model.equivalent_to_true_airspeed(speed, altitude)?;
                println!("EAS : {:.3} m/s", speed);
                println!("TAS : {:.3} m/s", tas);
            } else {
                let eas = model.true_to_equivalent_airspeed(speed, altitude)?;
                println!("TAS : {:.3} m/s", speed);
                println!("EAS : {:.3} m/s", eas);
            }
        }
        Command::Isentropic { mach, gamma } => {
            let state = GasState::new(mach, gamma)?;
            println!("M        : {}", state.mach());
            println!("T0/T     : {:.6}", state.t0_over_t());
            println!("p0/p     : {:.6}", state.p0_over_p());
            println!("rho0/rho : {:.6}", state.rho0_over_rho());
            println!("a0/a     : {:.6}", state.a0_over_a());
            match state.area_ratio() {
                Ok(ratio) => println!("A/A*     : {:.6}", ratio),
                Err(e) => println!("A/A*     : undefined ({})", e),
            }
        }
        Command::AreaRatio {
            ratio,
            supersonic,
            gamma,
        } => {
            let branch = if supersonic {
                FlowBranch::Supersonic
            } else {
                FlowBranch::Subsonic
            };
            let mach = mach_from_area_ratio(ratio, gamma, branch, config)?;
            println!("A/A* {} ({}): M = {:.6}", ratio, branch, mach);
        }
        Command::NormalShock { mach, gamma } => {
            let shock = NormalShock::new(mach, gamma)?;
            println!("M1        : {}", shock.m1());
            println!("M2        : {:.6}", shock.m2());
            println!("p2/p1     : {:.6}", shock.p2_over_p1());
            println!("rho2/rho1 : {:.6}", shock.rho2_over_rho1());
            println!("T2/T1     : {:.6}", shock.t2_over_t1());
            println!("p02/p01   : {:.6}", shock.p02_over_p01());
            println!("rho02/rho01 : {:.6}", shock.rho02_over_rho01());
            println!("T02/T01   : {:.6}", shock.t02_over_t01());
        }
        Command::ObliqueShock {
            mach,
            theta_deg,
            strong,
            gamma,
        } => {
            let branch = if strong {
                ShockBranch::Strong
            } else {
                ShockBranch::Weak
            };
            let shock =
                ObliqueShock::from_deflection(mach, theta_deg.to_radians(), gamma, branch, config)?;
            let (theta_max, _) = max_deflection(mach, gamma, config)?;
            println!("M1        : {}", shock.m1());
            println!("theta     : {:.4} deg (max {:.4} deg)", theta_deg, theta_max.to_degrees());
            println!("beta      : {:.4} deg ({})", shock.beta().to_degrees(), branch);
            println!("M1n       : {:.6}", shock.m1n());
            println!("M2n       : {:.6}", shock.m2n());
            println!("M2        : {:.6}", shock.m2());
            println!("p2/p1     : {:.6}", shock.p2_over_p1());
            println!("rho2/rho1 : {:.6}", shock.rho2_over_rho1());
            println!("T2/T1     : {:.6}", shock.t2_over_t1());
            println!("p02/p01   : {:.6}", shock.p02_over_p01());
            println!("rho02/rho01 : {:.6}", shock.rho02_over_rho01());
            println!("T02/T01   : {:.6}", shock.t02_over_t01());
        }
        Command::Expansion {
            mach,
            theta_deg,
            gamma,
        } => {
            let fan = PrandtlMeyerExpansion::new(mach, theta_deg.to_radians(), gamma, config)?;
            println!("M1        : {}", fan.m1());
            println!("nu1       : {:.4} deg", fan.nu1().to_degrees());
            println!("nu2       : {:.4} deg", fan.nu2().to_degrees());
            println!("mu1       : {:.4} deg", fan.mu1().to_degrees());
            println!("mu2       : {:.4} deg", fan.mu2().to_degrees());
            println!("M2        : {:.6}", fan.m2());
            println!("p2/p1     : {:.6}", fan.p2_over_p1());
            println!("rho2/rho1 : {:.6}", fan.rho2_over_rho1());
            println!("T2/T1     : {:.6}", fan.t2_over_t1());
        }
    }
    Ok(())
}

fn report_atmosphere(props: &AtmosphereProperties) {
    println!("z   : {:.3} m", props.geometric_altitude());
    println!("h   : {:.3} m geopotential", props.geopotential_altitude());
    println!("T   : {:.3} K", props.temperature());
    println!("p   : {:.3} Pa", props.pressure());
    println!("rho : {:.6} kg/m^3", props.density());
    println!("a   : {:.3} m/s", props.speed_of_sound());
}
