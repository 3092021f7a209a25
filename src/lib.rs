#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal point generators
//!
//! Two independent samplers that turn a step size and an iteration
//! bound into plain arrays of numbers, ready for whatever plots them.
//!
//! The Mandelbrot sampler lays a grid over the region around the set
//! and runs the escape-time iteration on each grid point, counting
//! how many times `z = z * z + c` can be applied before `z` leaves the
//! circle of radius two.  Either the escaping points (with a colour
//! per escape count) or the bounded points are kept.
//!
//! The bifurcation sampler sweeps the logistic map `x = r * x * (1 - x)`
//! over a range of `r` and records where each orbit ends up.
//!
//! Neither sampler logs, blocks on I/O, or holds state beyond its
//! configuration and its output buffers.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate num;
extern crate rand;

pub mod bifurcation;
pub mod errors;
pub mod gradient;
pub mod grid;
pub mod mandelbrot;

pub use bifurcation::{BifurcationEngine, BIFURCATION_LOAD_LIMIT};
pub use errors::FractalError;
pub use gradient::{blue_grad, psych_grad, ColorRGB};
pub use grid::{GridSpec, Region};
pub use mandelbrot::{escape_time, EscapeResult, MandelbrotEngine, MANDELBROT_LOAD_LIMIT};
