// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type shared by the engines and the command line front end.

use std::io;

/// Everything that can go wrong.  The engines themselves only ever
/// produce `InvalidConfiguration`; `Io` exists for callers writing
/// the results somewhere.
#[derive(Debug, Fail)]
pub enum FractalError {
    /// A step, precision, thread count or grid bound that would produce
    /// an empty or unbounded computation.
    #[fail(display = "invalid configuration: {}", reason)]
    InvalidConfiguration {
        /// What was wrong with it.
        reason: String,
    },

    /// A worker thread died before handing back its share of the grid.
    #[fail(display = "worker thread panicked")]
    WorkerPanicked,

    /// Failure writing output.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),
}

impl FractalError {
    /// Shorthand for building an `InvalidConfiguration`.
    pub fn invalid<S: Into<String>>(reason: S) -> Self {
        FractalError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for FractalError {
    fn from(err: io::Error) -> Self {
        FractalError::Io(err)
    }
}

/// Checks that a grid step is usable: strictly positive and finite.
pub fn validate_step(step: f64) -> Result<f64, FractalError> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(FractalError::invalid(format!(
            "step must be a positive number, got {}",
            step
        )))
    }
}

/// Checks that an iteration bound is usable.
pub fn validate_precision(precision: usize) -> Result<usize, FractalError> {
    if precision > 0 {
        Ok(precision)
    } else {
        Err(FractalError::invalid("precision must be at least 1"))
    }
}
