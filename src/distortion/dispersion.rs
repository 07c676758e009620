//! Kaiser distortion with Gaussian velocity-dispersion damping.
//!
//! ```text
//! D(k, μ) = (1 + β·μ²)² · exp(−(k·μ·σ)²)
//! ```
//!
//! The exponential models the finger-of-god suppression of small-scale power
//! along the line of sight by random pair velocities. Unlike the pure Kaiser
//! factor this is k-dependent, so every multipole moment of P(k)·D(k, μ) has to
//! be integrated numerically.

use super::kaiser::KaiserDistortion;
use super::DistortionFunction;

/// Kaiser factor times a Gaussian damping in k·μ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispersionDistortion {
    /// Redshift-space distortion parameter β.
    pub beta: f64,
    /// Pairwise velocity dispersion expressed as a length (Mpc/h).
    pub sigma: f64,
}

impl DispersionDistortion {
    pub fn new(beta: f64, sigma: f64) -> Self {
        Self { beta, sigma }
    }

    /// Damping factor exp(−(k·μ·σ)²).
    pub fn damping(&self, k: f64, mu: f64) -> f64 {
        let x = k * mu * self.sigma;
        (-x * x).exp()
    }
}

impl DistortionFunction for DispersionDistortion {
    fn evaluate(&self, k: f64, mu: f64) -> f64 {
        KaiserDistortion::new(self.beta).evaluate(k, mu) * self.damping(k, mu)
    }
}
