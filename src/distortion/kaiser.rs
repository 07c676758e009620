//! Linear redshift-space distortion: D(k, μ) = (1 + β·μ²)².
//!
//! Kaiser's large-scale limit of coherent infall. Independent of k, so its
//! Legendre multipoles are constants known in closed form.

use super::DistortionFunction;

/// Kaiser redshift-space distortion with linear growth parameter β.
///
/// ```text
/// D(μ) = (1 + β·μ²)²
/// ```
///
/// Only ℓ = 0, 2, 4 multipoles are non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KaiserDistortion {
    /// Redshift-space distortion parameter β = f/b.
    pub beta: f64,
}

impl KaiserDistortion {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Angular factor 1 + β·μ², the square root of the distortion.
    pub fn amplitude(&self, mu: f64) -> f64 {
        1.0 + self.beta * mu * mu
    }

    /// Closed-form Legendre coefficient c_ℓ with D(μ) = Σ c_ℓ·P_ℓ(μ).
    pub fn multipole(&self, ell: u32) -> f64 {
        let b = self.beta;
        match ell {
            0 => 1.0 + 2.0 * b / 3.0 + b * b / 5.0,
            2 => 4.0 * b / 3.0 + 4.0 * b * b / 7.0,
            4 => 8.0 * b * b / 35.0,
            _ => 0.0,
        }
    }
}

impl DistortionFunction for KaiserDistortion {
    fn evaluate(&self, _k: f64, mu: f64) -> f64 {
        let a = self.amplitude(mu);
        a * a
    }
}
