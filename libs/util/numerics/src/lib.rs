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
mod error;
mod solver;

pub use crate::{
    error::{require_finite, Error, Result},
    solver::{bisect, expand_bracket, maximize, SolverConfig},
};
