//! Anisotropic distortion models D(k, μ).
//!
//! A distortion multiplies the isotropic power spectrum: the observed power is
//! `P(k, μ) = P(k) · D(k, μ)`, with μ the cosine of the angle between the
//! wavevector and the line of sight. Redshift-space distortions are the usual
//! example.
//!
//! # Supported models
//!
//! - [`Distortion::None`] — isotropic, D ≡ 1
//! - [`Distortion::Kaiser`] — linear redshift-space distortion (1 + βμ²)²
//! - [`Distortion::Dispersion`] — Kaiser with a Gaussian finger-of-god damping
//!
//! Any closure `Fn(k, μ) -> f64` is also a [`DistortionFunction`], so custom
//! models need no wrapper type.

pub mod dispersion;
pub mod kaiser;

pub use dispersion::DispersionDistortion;
pub use kaiser::KaiserDistortion;

/// A real-valued distortion function `(k, μ) ↦ D(k, μ)`.
///
/// Must be defined for every k the transforms sample and for μ ∈ [-1, 1].
pub trait DistortionFunction: Send + Sync {
    fn evaluate(&self, k: f64, mu: f64) -> f64;
}

impl<F> DistortionFunction for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, k: f64, mu: f64) -> f64 {
        self(k, mu)
    }
}

/// Built-in distortion models.
#[derive(Debug, Clone, Default)]
pub enum Distortion {
    /// No distortion: D(k, μ) = 1.
    #[default]
    None,
    /// Linear (Kaiser) redshift-space distortion: D = (1 + βμ²)².
    Kaiser(KaiserDistortion),
    /// Kaiser factor times exp(−(kμσ)²).
    Dispersion(DispersionDistortion),
}

impl DistortionFunction for Distortion {
    fn evaluate(&self, k: f64, mu: f64) -> f64 {
        match self {
            Distortion::None => 1.0,
            Distortion::Kaiser(d) => d.evaluate(k, mu),
            Distortion::Dispersion(d) => d.evaluate(k, mu),
        }
    }
}
