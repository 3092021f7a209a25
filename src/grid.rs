//! Contains GridSpec, which describes the sampling of one axis, and
//! Region, which pairs a real axis with an imaginary axis to describe
//! a rectangle of sample points on the complex plane.
use itertools::iproduct;
use num::Complex;

use errors::{validate_step, FractalError};

/// Describes the sampling of a single axis: a start, a stop, and the
/// spacing requested between samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSpec {
    /// First sample.
    pub start: f64,
    /// Last sample.  Always emitted exactly, even when `step` does not
    /// divide the range evenly.
    pub stop: f64,
    /// Requested spacing.
    pub step: f64,
    count: usize,
}

impl GridSpec {
    /// Constructor.  Rejects non-positive or non-finite steps, a stop
    /// that lies before the start, and steps so small the sample count
    /// cannot be represented.
    pub fn new(start: f64, stop: f64, step: f64) -> Result<GridSpec, FractalError> {
        let step = validate_step(step)?;
        if !(start.is_finite() && stop.is_finite()) {
            return Err(FractalError::invalid("grid bounds must be finite"));
        }
        if stop < start {
            return Err(FractalError::invalid(format!(
                "grid stop {} lies before grid start {}",
                stop, start
            )));
        }
        let intervals = ((stop - start) / step).floor();
        if !(intervals < usize::max_value() as f64) {
            return Err(FractalError::invalid(format!(
                "step {} yields too many samples between {} and {}",
                step, start, stop
            )));
        }
        let count = (intervals as usize)
            .checked_add(1)
            .ok_or_else(|| FractalError::invalid(format!("step {} yields too many samples", step)))?;
        Ok(GridSpec {
            start,
            stop,
            step,
            count,
        })
    }

    /// The number of samples on this axis: floor(range / step) + 1.
    /// Never less than one.
    pub fn len(&self) -> usize {
        self.count
    }

    /// An axis always carries at least its start point.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The sample values along this axis.
    pub fn values(&self) -> Vec<f64> {
        linspace(self.start, self.stop, self.len())
    }

    /// The same number of samples as this axis, spread over bounds
    /// widened by `pad` on both ends.
    pub fn padded_values(&self, pad: f64) -> Vec<f64> {
        linspace(self.start - pad, self.stop + pad, self.len())
    }
}

/// `count` evenly spaced values from `start` to `stop`, both
/// included.  A single sample is just `start`.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let delta = (stop - start) / ((count - 1) as f64);
            let mut values: Vec<f64> = (0..count - 1)
                .map(|i| start + (i as f64) * delta)
                .collect();
            values.push(stop);
            values
        }
    }
}

/// A rectangle on the complex plane, described by its sampling along
/// the real and imaginary axes.
#[derive(Copy, Clone, Debug)]
pub struct Region {
    /// Sampling of the real axis.
    pub re: GridSpec,
    /// Sampling of the imaginary axis.
    pub im: GridSpec,
    count: usize,
}

impl Region {
    /// Builds a region from its lower-left and upper-right corners,
    /// sampled at the same step on both axes.
    pub fn new(
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        step: f64,
    ) -> Result<Region, FractalError> {
        let re = GridSpec::new(leftlower.re, rightupper.re, step)?;
        let im = GridSpec::new(leftlower.im, rightupper.im, step)?;
        let count = re.len().checked_mul(im.len()).ok_or_else(|| {
            FractalError::invalid(format!(
                "step {} yields more than {} grid points",
                step,
                usize::max_value()
            ))
        })?;
        Ok(Region { re, im, count })
    }

    /// The total number of sample points.  Used to estimate work.
    pub fn len(&self) -> usize {
        self.count
    }

    /// A region always holds at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The sample axes, optionally widened by `pad` on every side.
    /// The sample counts come from the unpadded region either way.
    pub fn axes(&self, pad: f64) -> (Vec<f64>, Vec<f64>) {
        (self.re.padded_values(pad), self.im.padded_values(pad))
    }

    /// Every sample point, row-major: for each real value, for each
    /// imaginary value.
    pub fn samples(&self, pad: f64) -> Vec<Complex<f64>> {
        let (re_values, im_values) = self.axes(pad);
        cross(&re_values, &im_values)
    }
}

/// The cross product of two axes as complex points, real axis outermost.
pub fn cross(re_values: &[f64], im_values: &[f64]) -> Vec<Complex<f64>> {
    iproduct!(re_values.iter(), im_values.iter())
        .map(|(&re, &im)| Complex::new(re, im))
        .collect()
}
