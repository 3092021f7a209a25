// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time Mandelbrot sampler.
//!
//! The Mandelbrot takes a point `c` on the complex plane, starts from
//! zero, and repeatedly squares and adds `c`, counting how many steps
//! it takes for the result to leave the circle of radius two.  Points
//! that never leave within `precision` steps are deemed to be inside
//! the set.
//!
//! The engine samples a fixed region of the plane on a square grid.
//! The coloured sweep keeps the points that *escaped* and colours them
//! by how long they took; the black and white sweep keeps the points
//! that did *not* escape.  Results are appended to the engine's
//! buffers, so repeated sweeps accumulate until `reset()` is called.

extern crate crossbeam;

use crossbeam::thread::ScopedJoinHandle;
use num::Complex;

use errors::{validate_precision, validate_step, FractalError};
use gradient::{psych_grad, ColorRGB};
use grid::{cross, Region};

/// Lower-left corner of the sampled region.
pub const REGION_LEFTLOWER: Complex<f64> = Complex { re: -2.0, im: -1.0 };

/// Upper-right corner of the sampled region.
pub const REGION_RIGHTUPPER: Complex<f64> = Complex { re: 0.5, im: 1.0 };

/// How far the coloured sweep extends past the region on every side.
pub const COLOR_PADDING: f64 = 0.1;

/// Above this `precision / step` an interactive caller should ask
/// before starting a sweep.
pub const MANDELBROT_LOAD_LIMIT: f64 = 250_000.0;

/// The outcome of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeResult {
    /// Iterations completed before the orbit left radius two, or the
    /// precision if it never did.
    pub iterations: usize,
    /// Whether the orbit left radius two within the precision.
    pub escaped: bool,
}

/// Iterates `z = z * z + c` from zero, at most `precision` times,
/// stopping the first time `|z| >= 2`.  The count is the index of the
/// step on which the escape was seen, so a point that is already
/// outside after the first step reports zero.
pub fn escape_time(c: Complex<f64>, precision: usize) -> EscapeResult {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 0..precision {
        z = z * z + c;
        if z.norm_sqr() >= 4.0 {
            return EscapeResult {
                iterations: i,
                escaped: true,
            };
        }
    }
    EscapeResult {
        iterations: precision,
        escaped: false,
    }
}

/// Which points a sweep keeps.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Retain {
    Escaped,
    Bounded,
}

/// Iterates every point in the cross product of the two axes and
/// returns the kept ones, in row-major order, with their counts.
fn sweep(
    re_values: &[f64],
    im_values: &[f64],
    precision: usize,
    retain: Retain,
) -> Vec<(Complex<f64>, usize)> {
    cross(re_values, im_values)
        .into_iter()
        .filter_map(|c| {
            let result = escape_time(c, precision);
            let keep = match retain {
                Retain::Escaped => result.escaped,
                Retain::Bounded => !result.escaped,
            };
            if keep {
                Some((c, result.iterations))
            } else {
                None
            }
        })
        .collect()
}

/// Samples the Mandelbrot region at a given step and precision.
pub struct MandelbrotEngine {
    region: Region,
    precision: usize,
    re_values: Vec<f64>,
    im_values: Vec<f64>,
    colors: Vec<ColorRGB>,
}

impl MandelbrotEngine {
    /// Requires the grid spacing and the maximum number of iterations
    /// per point.  Both must be positive.
    pub fn new(step: f64, precision: usize) -> Result<Self, FractalError> {
        let step = validate_step(step)?;
        Ok(MandelbrotEngine {
            region: Region::new(REGION_LEFTLOWER, REGION_RIGHTUPPER, step)?,
            precision: validate_precision(precision)?,
            re_values: vec![],
            im_values: vec![],
            colors: vec![],
        })
    }

    /// The grid spacing.
    pub fn step(&self) -> f64 {
        self.region.re.step
    }

    /// The iteration bound.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Changes the grid spacing for subsequent sweeps.  On error the
    /// engine is left unchanged.
    pub fn set_step(&mut self, step: f64) -> Result<(), FractalError> {
        self.region = Region::new(REGION_LEFTLOWER, REGION_RIGHTUPPER, step)?;
        Ok(())
    }

    /// Changes the iteration bound for subsequent sweeps.
    pub fn set_precision(&mut self, precision: usize) -> Result<(), FractalError> {
        self.precision = validate_precision(precision)?;
        Ok(())
    }

    /// The number of grid points a sweep will visit.
    pub fn sample_count(&self) -> usize {
        self.region.len()
    }

    /// Upper bound on the iterations a sweep performs.
    pub fn work_size(&self) -> usize {
        self.sample_count().saturating_mul(self.precision)
    }

    /// `precision / step`, the figure compared against
    /// `MANDELBROT_LOAD_LIMIT`.
    pub fn load_factor(&self) -> f64 {
        (self.precision as f64) / self.step()
    }

    /// Real parts of every retained point so far.
    pub fn re_values(&self) -> &[f64] {
        &self.re_values
    }

    /// Imaginary parts, parallel to `re_values()`.
    pub fn im_values(&self) -> &[f64] {
        &self.im_values
    }

    /// Colours, parallel to `re_values()`.  Only the coloured sweeps
    /// add entries here.
    pub fn colors(&self) -> &[ColorRGB] {
        &self.colors
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.re_values.len()
    }

    /// True when nothing has been retained yet.
    pub fn is_empty(&self) -> bool {
        self.re_values.is_empty()
    }

    /// Drops everything accumulated by earlier sweeps.
    pub fn reset(&mut self) {
        self.re_values.clear();
        self.im_values.clear();
        self.colors.clear();
    }

    /// Sweeps the padded region, keeping the points that escaped and
    /// colouring each by its escape count.
    pub fn compute_color(&mut self) -> Result<(), FractalError> {
        self.compute_color_threaded(1)
    }

    /// As `compute_color`, with the real axis shared out between
    /// `threads` workers.  The result is identical.
    pub fn compute_color_threaded(&mut self, threads: usize) -> Result<(), FractalError> {
        let points = self.retained(threads, COLOR_PADDING, Retain::Escaped)?;
        let precision = self.precision;
        self.colors
            .extend(points.iter().map(|&(_, count)| psych_grad(count, precision)));
        self.append(&points);
        Ok(())
    }

    /// Sweeps the unpadded region, keeping the points that never
    /// escaped.  No colours are produced.
    pub fn compute_black_white(&mut self) -> Result<(), FractalError> {
        self.compute_black_white_threaded(1)
    }

    /// As `compute_black_white`, split between `threads` workers.
    pub fn compute_black_white_threaded(&mut self, threads: usize) -> Result<(), FractalError> {
        let points = self.retained(threads, 0.0, Retain::Bounded)?;
        self.append(&points);
        Ok(())
    }

    fn append(&mut self, points: &[(Complex<f64>, usize)]) {
        self.re_values.extend(points.iter().map(|&(c, _)| c.re));
        self.im_values.extend(points.iter().map(|&(c, _)| c.im));
    }

    /// Runs the sweep, on this thread if `threads` is one, otherwise
    /// on contiguous slices of the real axis joined back in order.
    fn retained(
        &self,
        threads: usize,
        pad: f64,
        retain: Retain,
    ) -> Result<Vec<(Complex<f64>, usize)>, FractalError> {
        if threads == 0 {
            return Err(FractalError::invalid("thread count must be at least 1"));
        }
        let (re_values, im_values) = self.region.axes(pad);
        let precision = self.precision;
        if threads == 1 {
            return Ok(sweep(&re_values, &im_values, precision, retain));
        }

        let columns = (re_values.len() + threads - 1) / threads;
        let im_values = &im_values;
        let slices = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Vec<(Complex<f64>, usize)>>> = re_values
                .chunks(columns)
                .map(|column| spawner.spawn(move |_| sweep(column, im_values, precision, retain)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| FractalError::WorkerPanicked)?
        .map_err(|_| FractalError::WorkerPanicked)?;

        Ok(slices.into_iter().flatten().collect())
    }
}
