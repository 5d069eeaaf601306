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
use thiserror::Error;

/// Every failure the atmosphere and gas dynamics libraries can report.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// The input lies outside the physically or mathematically valid range.
    #[error("outside of model domain: {0}")]
    Domain(String),

    /// The caller combined or formed arguments in a way no query accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded iteration ran out of budget before reaching tolerance.
    #[error("no convergence after {iterations} iterations (bracket width {width:e})")]
    Convergence { iterations: usize, width: f64 },
}

impl Error {
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_convergence(&self) -> bool {
        matches!(self, Self::Convergence { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject NaN and infinities up front, so they cannot leak into a bracket.
pub fn require_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidArgument(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}
