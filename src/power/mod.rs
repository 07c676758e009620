//! Isotropic power spectra P(k).
//!
//! Anything implementing [`PowerSpectrum`] can drive the transform engine:
//! closures `Fn(f64) -> f64`, the analytic [`PowerLaw`], or a [`TabulatedPower`]
//! built from samples (which is also how power multipoles are cached on the
//! k grid).

pub mod tabulated;

pub use tabulated::TabulatedPower;

/// A real-valued power spectrum `k ↦ P(k)`.
///
/// Implementations must be thread-safe so that multipoles can be transformed
/// in parallel.
pub trait PowerSpectrum: Send + Sync {
    /// Evaluate P(k) at wavenumber `k` (h/Mpc).
    fn evaluate(&self, k: f64) -> f64;
}

impl<F> PowerSpectrum for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, k: f64) -> f64 {
        self(k)
    }
}

/// Pure power law `P(k) = amplitude · k^index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    pub amplitude: f64,
    pub index: f64,
}

impl PowerLaw {
    pub fn new(amplitude: f64, index: f64) -> Self {
        Self { amplitude, index }
    }
}

impl PowerSpectrum for PowerLaw {
    fn evaluate(&self, k: f64) -> f64 {
        self.amplitude * k.powf(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_and_power_law_agree() {
        let law = PowerLaw::new(2.5, -1.5);
        let closure = |k: f64| 2.5 * k.powf(-1.5);
        for &k in &[1e-3_f64, 0.1, 1.0, 30.0] {
            assert_eq!(law.evaluate(k), closure.evaluate(k));
        }
    }
}
