//! # xipole
//!
//! Anisotropic **correlation functions from distorted power spectra**, computed
//! by Legendre multipole decomposition and spherical-Bessel transforms.
//!
//! Given an isotropic power spectrum P(k) and a distortion D(k, μ) (redshift-space
//! distortions, say), `xipole` computes the two-point correlation function
//!
//! ```text
//! ξ(r, μ) = Σ_ℓ ξ_ℓ(r) L_ℓ(μ),    ξ_ℓ(r) = i^ℓ/(2π²) ∫ k² P_ℓ(k) j_ℓ(kr) dk
//! ```
//!
//! where `P_ℓ(k)` are the Legendre moments of `P(k)·D(k, μ)`.
//!
//! ## Features
//!
//! - **Calibrated accuracy** — per-multipole error budgets are set from each
//!   multipole's measured contribution to the reassembled ξ(r, μ)
//! - **Adaptive transforms** — the k range and sampling density of every
//!   multipole transform are chosen to meet its error target; each transform is
//!   an FFT in ln k against the exact Mellin moments of j_ℓ
//! - **Cached power multipoles** — the angular integrals are tabulated once on a
//!   log-spaced k grid and splined
//! - **Pluggable inputs** — any closure is a power spectrum or a distortion;
//!   power-law, tabulated, Kaiser and dispersion models are built in
//! - **Parallel** — with the `parallel` feature, multipoles are transformed
//!   concurrently with [rayon](https://docs.rs/rayon)
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use xipole::{CorrelationConfig, DistortedPowerCorrelation, InitializeConfig};
//!
//! // P(k) ∝ k^-2 with a Kaiser-like distortion written as a closure
//! let beta = 0.4_f64;
//! let config = CorrelationConfig {
//!     k_min: 1e-3,
//!     k_max: 10.0,
//!     r_min: 10.0,
//!     r_max: 150.0,
//!     nr: 57,
//!     ..Default::default()
//! };
//! let mut xi = DistortedPowerCorrelation::new(
//!     Arc::new(|k: f64| 1.0 / (k * k)),
//!     Arc::new(move |_k: f64, mu: f64| (1.0 + beta * mu * mu).powi(2)),
//!     &config,
//! )?;
//!
//! if !xi.initialize(&InitializeConfig::default())? {
//!     eprintln!("warning: accuracy target not met");
//! }
//! for r in [20.0, 50.0, 100.0] {
//!     println!(
//!         "r = {r}: xi0 = {:.4e}, xi2 = {:.4e}, xi(mu=1) = {:.4e}",
//!         xi.correlation_multipole(r, 0)?,
//!         xi.correlation_multipole(r, 2)?,
//!         xi.correlation(r, 1.0)?
//!     );
//! }
//! # Ok::<(), xipole::Error>(())
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Power multipoles** — the angular integral `(2ℓ+1)/2 ∫ D(k,μ) L_ℓ(μ) dμ` is
//!    done by Gauss-Legendre quadrature at every k grid point and splined
//! 2. **Provisional transforms** — every multipole is transformed to the r grid
//!    with a generous error budget
//! 3. **Calibration sweep** — ξ(r, μ) is reassembled over (r, μ) and each
//!    multipole's largest relative contribution to the total is recorded
//! 4. **Final transforms** — each multipole is re-transformed with its share of
//!    the error budget, loosened by how little it contributes
//! 5. **Reassembly** — ξ(r, μ) on demand from the splined multipoles
//!

pub mod correlation;
pub mod distortion;
mod error;
pub mod interpolate;
pub mod power;
pub mod special;
pub mod transform;

pub use correlation::{
    BiggestContribution, CorrelationConfig, DistortedPowerCorrelation, InitializeConfig,
    MultipoleSet, SamplingGrids,
};
pub use distortion::{
    DispersionDistortion, Distortion, DistortionFunction, KaiserDistortion,
};
pub use error::{Error, Result};
pub use interpolate::CubicSpline;
pub use power::{PowerLaw, PowerSpectrum, TabulatedPower};
pub use special::GaussLegendre;
pub use transform::{
    multipole_transform_normalization, AdaptiveMultipoleTransform, TransformKind, TransformPlan,
};
