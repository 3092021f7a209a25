//! Colour maps from an escape count to an RGB triple.  Both are pure
//! functions of the count and the precision it was measured against.

use num::clamp;

/// An RGB colour with each channel in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorRGB {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl ColorRGB {
    /// Builds a colour, clamping each channel into [0, 1].
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        ColorRGB {
            r: clamp(r, 0.0, 1.0),
            g: clamp(g, 0.0, 1.0),
            b: clamp(b, 0.0, 1.0),
        }
    }

    /// (1, 1, 1)
    pub fn white() -> Self {
        ColorRGB::new(1.0, 1.0, 1.0)
    }

    /// (0, 0, 0)
    pub fn black() -> Self {
        ColorRGB::new(0.0, 0.0, 0.0)
    }
}

/// The "psychedelic" gradient used for the coloured Mandelbrot.
///
/// Points that never escaped (`count == precision`) are white, points
/// that escaped on the very last iteration are black, and everything
/// else ramps from teal toward white as `count / precision` grows.
/// Callers that already filter out the bounded set will never see the
/// white branch.
pub fn psych_grad(count: usize, precision: usize) -> ColorRGB {
    if count == precision {
        return ColorRGB::white();
    }
    if count + 1 == precision {
        return ColorRGB::black();
    }
    let t = ratio(count, precision);
    ColorRGB::new(t, 0.5 + t / 2.0, 0.25 + 0.75 * t)
}

/// A pale blue gradient that darkens as the count approaches the
/// precision.
pub fn blue_grad(count: usize, precision: usize) -> ColorRGB {
    let t = ratio(count, precision);
    ColorRGB::new(1.0 - t, 1.0 - t, 1.0 - t / 2.0)
}

fn ratio(count: usize, precision: usize) -> f64 {
    if precision == 0 {
        return 1.0;
    }
    (count as f64) / (precision as f64)
}
