//! Multipole integral transforms from wavenumber space to separation space.
//!
//! The ℓ-th multipole of the correlation function is the spherical-Bessel
//! (Hankel-type) transform of the ℓ-th multipole of the power spectrum:
//!
//! ```text
//! ξ_ℓ(r) = c_ℓ ∫ k² P_ℓ(k) j_ℓ(kr) dk,    c_ℓ = i^ℓ / (2π²)
//! ```
//!
//! [`AdaptiveMultipoleTransform`] evaluates this on a fixed set of r samples,
//! choosing the k range and sampling density so that the result meets a
//! relative/absolute error target. [`multipole_transform_normalization`]
//! provides c_ℓ.

pub mod adaptive;
pub mod plan;

use std::f64::consts::PI;

pub use adaptive::AdaptiveMultipoleTransform;
pub use plan::TransformPlan;

use crate::error::{Error, Result};

/// Kernel of a multipole transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransformKind {
    /// Spherical Bessel functions j_ℓ: three-dimensional multipoles.
    SphericalBessel,
}

/// Normalization coefficient of the ℓ-th multipole transform.
///
/// `dimension` is 2 or 3; `sign` is +1 for the forward k → r direction and −1
/// for the inverse r → k direction. The complex phase `i^(sign·ℓ)` is reduced to
/// its real convention by ℓ mod 4: `1, sign, −1, −sign`. The solid-angle factor
/// is 4π in three dimensions and 2π in two, divided by `(2π)^dimension` in the
/// forward direction.
pub fn multipole_transform_normalization(ell: u32, dimension: u32, sign: i32) -> Result<f64> {
    let solid_angle = match dimension {
        2 => 2.0 * PI,
        3 => 4.0 * PI,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "multipole_transform_normalization: expected dimension 2 or 3, got {dimension}"
            )))
        }
    };
    let s = match sign {
        1 => 1.0,
        -1 => -1.0,
        _ => {
            return Err(Error::InvalidArgument(format!(
                "multipole_transform_normalization: expected sign +1 or -1, got {sign}"
            )))
        }
    };
    let phase = match ell % 4 {
        0 => 1.0,
        1 => s,
        2 => -1.0,
        _ => -s,
    };
    let scale = if sign > 0 {
        (2.0 * PI).powi(-(dimension as i32))
    } else {
        1.0
    };
    Ok(phase * solid_angle * scale)
}

/// Dual error target: a result at separation r is acceptable when its error is
/// within `max(relerr·|ξ(r)|, abserr·r^abspow)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tolerance {
    pub relerr: f64,
    pub abserr: f64,
    pub abspow: f64,
}

impl Tolerance {
    /// Allowed error at separation `r` for a result of size `value`.
    pub fn at(&self, r: f64, value: f64) -> f64 {
        (self.relerr * value.abs()).max(self.abserr * r.powf(self.abspow))
    }

    /// Whether `other` agrees with `reference` at every separation.
    pub fn accepts(&self, r: &[f64], reference: &[f64], other: &[f64]) -> bool {
        r.iter()
            .zip(reference.iter().zip(other))
            .all(|(&r, (&a, &b))| (a - b).abs() <= self.at(r, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_normalization() {
        let c0 = multipole_transform_normalization(0, 3, 1).unwrap();
        assert!((c0 - 1.0 / (2.0 * PI * PI)).abs() < 1e-15);
        let c2 = multipole_transform_normalization(2, 3, 1).unwrap();
        assert!((c2 + c0).abs() < 1e-15);
        let c4 = multipole_transform_normalization(4, 3, 1).unwrap();
        assert!((c4 - c0).abs() < 1e-15);
        let c1 = multipole_transform_normalization(1, 3, 1).unwrap();
        let c3 = multipole_transform_normalization(3, 3, 1).unwrap();
        assert!((c1 - c0).abs() < 1e-15 && (c3 + c0).abs() < 1e-15);
        let c0_2d = multipole_transform_normalization(0, 2, 1).unwrap();
        assert!((c0_2d - 1.0 / (2.0 * PI)).abs() < 1e-15);
    }

    #[test]
    fn test_inverse_normalization() {
        assert!((multipole_transform_normalization(0, 3, -1).unwrap() - 4.0 * PI).abs() < 1e-14);
        assert!((multipole_transform_normalization(1, 3, -1).unwrap() + 4.0 * PI).abs() < 1e-14);
    }

    #[test]
    fn test_normalization_rejects_bad_arguments() {
        assert!(multipole_transform_normalization(0, 4, 1).is_err());
        assert!(multipole_transform_normalization(0, 3, 0).is_err());
    }

    #[test]
    fn test_tolerance() {
        let tol = Tolerance {
            relerr: 1e-2,
            abserr: 1e-4,
            abspow: 1.0,
        };
        assert!((tol.at(10.0, 1.0) - 1e-2).abs() < 1e-15);
        assert!((tol.at(10.0, 0.0) - 1e-3).abs() < 1e-15);
        let r = [1.0, 2.0];
        assert!(tol.accepts(&r, &[1.0, 2.0], &[1.005, 2.01]));
        assert!(!tol.accepts(&r, &[1.0, 2.0], &[1.02, 2.0]));
    }
}
