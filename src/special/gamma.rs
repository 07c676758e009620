//! Logarithm of the gamma function for complex arguments.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Real part the argument is shifted up to before the asymptotic series.
const STIRLING_SHIFT: f64 = 10.0;

/// ln Γ(z) for `Re z > 0`.
///
/// Shifts z upward with `ln Γ(z) = ln Γ(z+1) − ln z` and then sums the Stirling
/// series through the z⁻⁷ term. The imaginary part is determined modulo 2π,
/// which is all `exp(ln_gamma(a) - ln_gamma(b))` needs.
pub fn ln_gamma(z: Complex64) -> Complex64 {
    let mut z = z;
    let mut shift = Complex64::new(0.0, 0.0);
    while z.re < STIRLING_SHIFT {
        shift -= z.ln();
        z += 1.0;
    }
    let inv = z.inv();
    let inv2 = inv * inv;
    let series =
        inv * (1.0 / 12.0 - inv2 * (1.0 / 360.0 - inv2 * (1.0 / 1260.0 - inv2 / 1680.0)));
    shift + (z - 0.5) * z.ln() - z + 0.5 * (2.0 * PI).ln() + series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    #[test]
    fn test_real_arguments() {
        assert!(ln_gamma(real(1.0)).norm() < 1e-13);
        assert!(ln_gamma(real(2.0)).norm() < 1e-13);
        assert!((ln_gamma(real(5.0)).re - 24f64.ln()).abs() < 1e-12);
        assert!((ln_gamma(real(0.5)).re - PI.sqrt().ln()).abs() < 1e-12);
        // Γ(1/4) = 3.625609908221908...
        assert!((ln_gamma(real(0.25)).re - 3.625_609_908_221_908_f64.ln()).abs() < 1e-12);
        assert!(ln_gamma(real(0.25)).im.abs() < 1e-13);
    }

    #[test]
    fn test_imaginary_axis_modulus() {
        // |Γ(1/2 + iy)|² = π / cosh(πy)
        for y in [0.3_f64, 2.0, 15.0, 100.0] {
            let got = 2.0 * ln_gamma(Complex64::new(0.5, y)).re;
            let expected = PI.ln() - (PI * y).cosh().ln();
            assert!(
                (got - expected).abs() < 1e-10 * expected.abs().max(1.0),
                "y={y}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_conjugate_symmetry() {
        let z = Complex64::new(0.75, 3.2);
        let a = ln_gamma(z).exp();
        let b = ln_gamma(z.conj()).exp();
        assert!((a - b.conj()).norm() < 1e-14 * a.norm());
    }
}
