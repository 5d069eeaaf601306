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
use crate::{Error, Result};
use log::trace;

const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;
const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-12;
const DEFAULT_MAX_ITERATIONS: usize = 100;

// 1/phi, the interval reduction per golden section step.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Tolerance and iteration budget shared by every iterative query.
///
/// A bracket `[lo, hi]` is converged once
/// `hi - lo <= absolute_tolerance + relative_tolerance * |midpoint|`.
/// Running out of iterations first is reported as `Error::Convergence`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    relative_tolerance: f64,
    absolute_tolerance: f64,
    max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn new(
        relative_tolerance: f64,
        absolute_tolerance: f64,
        max_iterations: usize,
    ) -> Result<Self> {
        let config = Self {
            relative_tolerance,
            absolute_tolerance,
            max_iterations,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_relative_tolerance(mut self, relative_tolerance: f64) -> Result<Self> {
        self.relative_tolerance = relative_tolerance;
        self.validate()?;
        Ok(self)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self> {
        self.max_iterations = max_iterations;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        // Both tolerances may not be zero at once, or a bracket can never close.
        if !(self.relative_tolerance >= 0.0 && self.relative_tolerance.is_finite())
            || !(self.absolute_tolerance >= 0.0 && self.absolute_tolerance.is_finite())
            || self.relative_tolerance + self.absolute_tolerance <= 0.0
        {
            return Err(Error::InvalidArgument(format!(
                "solver tolerances must be non-negative and not both zero, got relative {} and absolute {}",
                self.relative_tolerance, self.absolute_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidArgument(
                "solver needs at least one iteration".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn is_converged(&self, lo: f64, hi: f64) -> bool {
        let mid = lo + 0.5 * (hi - lo);
        (hi - lo).abs() <= self.absolute_tolerance + self.relative_tolerance * mid.abs()
    }
}

/// Find a root of `f` in `[lo, hi]` by bisection.
///
/// `f(lo)` and `f(hi)` must have opposite signs (or one of them must be
/// zero); otherwise the root is not bracketed and the call fails with
/// `Error::Domain`. Errors from `f` are passed straight through.
pub fn bisect<F>(mut f: F, lo: f64, hi: f64, config: &SolverConfig) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

    let f_lo = f(lo)?;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    let f_hi = f(hi)?;
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.is_nan() || f_hi.is_nan() || (f_lo < 0.0) == (f_hi < 0.0) {
        return Err(Error::Domain(format!(
            "no sign change in [{}, {}]: f(lo) = {}, f(hi) = {}",
            lo, hi, f_lo, f_hi
        )));
    }
    let lo_is_negative = f_lo < 0.0;

    for iteration in 0..config.max_iterations() {
        let mid = lo + 0.5 * (hi - lo);
        if config.is_converged(lo, hi) {
            trace!("bisect converged to {} after {} iterations", mid, iteration);
            return Ok(mid);
        }
        let f_mid = f(mid)?;
        if f_mid == 0.0 {
            trace!("bisect hit exact root {} after {} iterations", mid, iteration);
            return Ok(mid);
        }
        if f_mid.is_nan() {
            return Err(Error::Domain(format!("objective is undefined at {}", mid)));
        }
        if (f_mid < 0.0) == lo_is_negative {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    if config.is_converged(lo, hi) {
        return Ok(lo + 0.5 * (hi - lo));
    }
    Err(Error::Convergence {
        iterations: config.max_iterations(),
        width: hi - lo,
    })
}

/// Step geometrically away from `anchor` until `f` changes sign.
///
/// Samples `start`, `start * factor`, `start * factor^2`, ... and returns the
/// last sample whose sign matches `f(anchor)` together with the first sample
/// that does not. The pair is suitable for `bisect`. A factor above one grows
/// the sample, a factor in (0, 1) shrinks it toward zero.
pub fn expand_bracket<F>(
    mut f: F,
    anchor: f64,
    start: f64,
    factor: f64,
    config: &SolverConfig,
) -> Result<(f64, f64)>
where
    F: FnMut(f64) -> Result<f64>,
{
    if !(factor > 0.0 && factor != 1.0 && factor.is_finite()) {
        return Err(Error::InvalidArgument(format!(
            "bracket expansion factor must be positive and not one, got {}",
            factor
        )));
    }

    let f_anchor = f(anchor)?;
    if f_anchor == 0.0 {
        return Ok((anchor, anchor));
    }
    let anchor_is_negative = f_anchor < 0.0;

    let mut inner = anchor;
    let mut sample = start;
    for iteration in 0..config.max_iterations() {
        let f_sample = f(sample)?;
        if f_sample.is_nan() {
            return Err(Error::Domain(format!("objective is undefined at {}", sample)));
        }
        if f_sample == 0.0 || (f_sample < 0.0) != anchor_is_negative {
            trace!(
                "bracket [{}, {}] found after {} samples",
                inner,
                sample,
                iteration + 1
            );
            return Ok((inner, sample));
        }
        inner = sample;
        sample *= factor;
    }

    Err(Error::Convergence {
        iterations: config.max_iterations(),
        width: (sample - inner).abs(),
    })
}

/// Locate the maximum of a unimodal `f` on `[lo, hi]` by golden section search.
///
/// Returns `(x, f(x))` at the midpoint of the final bracket.
pub fn maximize<F>(mut f: F, lo: f64, hi: f64, config: &SolverConfig) -> Result<(f64, f64)>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut f_c = f(c);
    let mut f_d = f(d);

    for iteration in 0..config.max_iterations() {
        if config.is_converged(a, b) {
            let x = a + 0.5 * (b - a);
            trace!("maximize converged to {} after {} iterations", x, iteration);
            return Ok((x, f(x)));
        }
        if f_c > f_d {
            b = d;
            d = c;
            f_d = f_c;
            c = b - INV_PHI * (b - a);
            f_c = f(c);
        } else {
            a = c;
            c = d;
            f_c = f_d;
            d = a + INV_PHI * (b - a);
            f_d = f(d);
        }
    }

    if config.is_converged(a, b) {
        let x = a + 0.5 * (b - a);
        return Ok((x, f(x)));
    }
    Err(Error::Convergence {
        iterations: config.max_iterations(),
        width: b - a,
    })
}
