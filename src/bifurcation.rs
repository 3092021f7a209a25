//! Logistic map bifurcation sampler.
//!
//! For each value of the control parameter `r`, the logistic map
//! `x = r * x * (1 - x)` is iterated from a fixed seed and the final
//! iterate is recorded.  Plotting `x` against `r` gives the familiar
//! period-doubling cascade.
//!
//! Each `r` is iterated `precision` times plus a small random number
//! of extra steps, drawn afresh for every `r`.  On the periodic
//! branches the extra steps pick a different point of the cycle, which
//! fills in every branch instead of only the one a fixed iteration
//! count lands on.  A seed makes the draws reproducible.

use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;

use errors::{validate_precision, FractalError};
use grid::GridSpec;

/// First value of `r` in the sweep.
pub const R_START: f64 = -2.0;

/// Last value of `r` in the sweep.
pub const R_STOP: f64 = 0.5;

/// Starting value of `x` for every `r`.
pub const X_SEED: f64 = 0.2;

/// Largest number of extra iterations added to the precision.
pub const JITTER_MAX: usize = 10;

/// Above this `precision / step` an interactive caller should ask
/// before starting a sweep.
pub const BIFURCATION_LOAD_LIMIT: f64 = 10_000_000.0;

/// Draws the number of extra iterations for each `r`.
struct Jitter(Uniform<usize>, StdRng);

impl Jitter {
    pub fn new(seed: Option<u64>) -> Self {
        let u = Uniform::new_inclusive(0, JITTER_MAX);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Jitter(u, rng)
    }
    pub fn get(&mut self) -> usize {
        self.0.sample(&mut self.1)
    }
}

/// Applies the logistic map `iterations` times starting from `x`.
pub fn logistic(r: f64, x: f64, iterations: usize) -> f64 {
    (0..iterations).fold(x, |x, _| r * x * (1.0 - x))
}

/// Sweeps `r` at a given step, iterating the logistic map at a given
/// precision.
pub struct BifurcationEngine {
    axis: GridSpec,
    precision: usize,
    seed: Option<u64>,
    r_values: Vec<f64>,
    x_values: Vec<f64>,
}

impl BifurcationEngine {
    /// Requires the spacing between successive `r` and the base number
    /// of iterations.  Jitter is drawn from OS entropy.
    pub fn new(step: f64, precision: usize) -> Result<Self, FractalError> {
        Ok(BifurcationEngine {
            axis: GridSpec::new(R_START, R_STOP, step)?,
            precision: validate_precision(precision)?,
            seed: None,
            r_values: vec![],
            x_values: vec![],
        })
    }

    /// As `new`, but every sweep draws its jitter from a generator
    /// seeded with `seed`, so repeated sweeps agree exactly.
    pub fn with_seed(step: f64, precision: usize, seed: u64) -> Result<Self, FractalError> {
        let mut engine = BifurcationEngine::new(step, precision)?;
        engine.seed = Some(seed);
        Ok(engine)
    }

    /// Replaces the jitter seed.  `None` goes back to OS entropy.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Spacing between successive `r`.
    pub fn step(&self) -> f64 {
        self.axis.step
    }

    /// Base number of iterations.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Changes the spacing for subsequent sweeps.
    pub fn set_step(&mut self, step: f64) -> Result<(), FractalError> {
        self.axis = GridSpec::new(R_START, R_STOP, step)?;
        Ok(())
    }

    /// Changes the base iteration count for subsequent sweeps.
    pub fn set_precision(&mut self, precision: usize) -> Result<(), FractalError> {
        self.precision = validate_precision(precision)?;
        Ok(())
    }

    /// Number of `r` values in one sweep.
    pub fn sample_count(&self) -> usize {
        self.axis.len()
    }

    /// Iterations a sweep performs, ignoring jitter.
    pub fn work_size(&self) -> usize {
        self.sample_count().saturating_mul(self.precision)
    }

    /// `precision / step`, the figure compared against
    /// `BIFURCATION_LOAD_LIMIT`.
    pub fn load_factor(&self) -> f64 {
        (self.precision as f64) / self.step()
    }

    /// Every `r` swept so far.
    pub fn r_values(&self) -> &[f64] {
        &self.r_values
    }

    /// The recorded values, parallel to `r_values()`.
    pub fn x_values(&self) -> &[f64] {
        &self.x_values
    }

    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.r_values.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.r_values.is_empty()
    }

    /// Drops everything accumulated by earlier sweeps.
    pub fn reset(&mut self) {
        self.r_values.clear();
        self.x_values.clear();
    }

    /// Records the final iterate for every `r`.
    pub fn compute_bifurcation(&mut self) -> Result<(), FractalError> {
        self.sweep(|x| x);
        Ok(())
    }

    /// Records `|c| * x * (1 - x)` for every `r`, where `x` is the
    /// final iterate and `c = real + imag i`: one more step of the map
    /// with the magnitude of the point standing in for `r`.
    pub fn compute_from_point(&mut self, real: f64, imag: f64) -> Result<(), FractalError> {
        let scale = Complex::new(real, imag).norm();
        if !scale.is_finite() {
            return Err(FractalError::invalid(format!(
                "point {},{} has no finite magnitude",
                real, imag
            )));
        }
        self.sweep(|x| scale * x * (1.0 - x));
        Ok(())
    }

    fn sweep<F: Fn(f64) -> f64>(&mut self, finish: F) {
        let mut jitter = Jitter::new(self.seed);
        let r_values = self.axis.values();
        let precision = self.precision;
        let x_values: Vec<f64> = r_values
            .iter()
            .map(|&r| finish(logistic(r, X_SEED, precision + jitter.get())))
            .collect();
        self.r_values.extend(r_values);
        self.x_values.extend(x_values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_iterates() {
        assert_eq!(logistic(2.0, 0.2, 0), 0.2);
        assert_eq!(logistic(2.0, 0.5, 1), 0.5);
        assert_eq!(logistic(0.0, 0.2, 1), 0.0);
        // 0.2 -> 0.32 -> 0.4352
        assert!((logistic(2.0, 0.2, 2) - 0.4352).abs() < 1e-12);
    }

    #[test]
    fn engine_fails_on_bad_configuration() {
        assert!(BifurcationEngine::new(0.0, 10).is_err());
        assert!(BifurcationEngine::new(::std::f64::NAN, 10).is_err());
        assert!(BifurcationEngine::new(0.1, 0).is_err());
    }

    #[test]
    fn sweep_covers_the_range() {
        let mut engine = BifurcationEngine::new(0.5, 10).unwrap();
        engine.compute_bifurcation().unwrap();
        assert_eq!(engine.r_values(), &[-2.0, -1.5, -1.0, -0.5, 0.0, 0.5][..]);
        assert_eq!(engine.x_values().len(), 6);
    }

    #[test]
    fn r_zero_collapses_to_zero() {
        for _ in 0..20 {
            let mut engine = BifurcationEngine::new(0.5, 3).unwrap();
            engine.compute_bifurcation().unwrap();
            assert_eq!(engine.x_values()[4], 0.0);
        }
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut jitter = Jitter::new(Some(7));
        for _ in 0..1000 {
            assert!(jitter.get() <= JITTER_MAX);
        }
    }

    #[test]
    fn seeded_sweeps_agree() {
        let mut a = BifurcationEngine::with_seed(0.01, 50, 42).unwrap();
        let mut b = BifurcationEngine::with_seed(0.01, 50, 42).unwrap();
        a.compute_bifurcation().unwrap();
        b.compute_bifurcation().unwrap();
        assert_eq!(a.r_values(), b.r_values());
        assert_eq!(a.x_values(), b.x_values());
    }

    #[test]
    fn unseeded_sweeps_share_r_and_stay_finite() {
        let mut a = BifurcationEngine::new(0.01, 50).unwrap();
        let mut b = BifurcationEngine::new(0.01, 50).unwrap();
        a.compute_bifurcation().unwrap();
        b.compute_bifurcation().unwrap();
        assert_eq!(a.r_values(), b.r_values());
        assert!(a.x_values().iter().chain(b.x_values()).all(|x| x.is_finite()));
    }

    #[test]
    fn from_point_scales_the_final_iterate() {
        let mut plain = BifurcationEngine::with_seed(0.25, 30, 3).unwrap();
        let mut scaled = BifurcationEngine::with_seed(0.25, 30, 3).unwrap();
        plain.compute_bifurcation().unwrap();
        scaled.compute_from_point(3.0, 4.0).unwrap();
        assert_eq!(plain.r_values(), scaled.r_values());
        for (&x, &y) in plain.x_values().iter().zip(scaled.x_values()) {
            assert!((y - 5.0 * x * (1.0 - x)).abs() < 1e-12);
        }
    }

    #[test]
    fn from_point_rejects_infinite_magnitude() {
        let mut engine = BifurcationEngine::with_seed(0.25, 30, 1).unwrap();
        assert!(engine.compute_from_point(::std::f64::INFINITY, 0.0).is_err());
        assert!(engine.compute_from_point(0.0, ::std::f64::NAN).is_err());
        assert!(engine.r_values().is_empty());
        assert!(engine.x_values().is_empty());
    }

    #[test]
    fn from_origin_is_all_zero() {
        let mut engine = BifurcationEngine::new(0.25, 30).unwrap();
        engine.compute_from_point(0.0, 0.0).unwrap();
        assert!(engine.x_values().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn sweeps_append_until_reset() {
        let mut engine = BifurcationEngine::new(0.5, 10).unwrap();
        engine.compute_bifurcation().unwrap();
        engine.compute_bifurcation().unwrap();
        assert_eq!(engine.len(), 12);
        engine.reset();
        assert!(engine.is_empty());
    }

    #[test]
    fn load_factor_and_work_size() {
        let engine = BifurcationEngine::new(0.5, 10).unwrap();
        assert_eq!(engine.sample_count(), 6);
        assert_eq!(engine.work_size(), 60);
        assert_eq!(engine.load_factor(), 20.0);
    }
}
