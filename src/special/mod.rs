//! Special functions used by the multipole machinery.
//!
//! - [`legendre_p`] — Legendre polynomials P_ℓ(μ), used for angular projection and
//!   for reassembling ξ(r,μ) from its multipoles.
//! - [`spherical_bessel_j`] — spherical Bessel functions j_ℓ(x), the kernel of the
//!   k → r transform.
//! - [`GaussLegendre`] — fixed-order quadrature on [-1, 1] for the angular integral
//!   that projects D(k,μ) onto a Legendre multipole.
//! - [`ln_gamma`] — complex log-gamma, for the Mellin moments of j_ℓ.

mod gamma;
pub mod quadrature;

pub use gamma::ln_gamma;
pub use quadrature::GaussLegendre;

/// Legendre polynomial P_ℓ(μ).
///
/// Uses the three-term recurrence `n·P_n = (2n-1)·μ·P_{n-1} - (n-1)·P_{n-2}`,
/// which is stable on [-1, 1].
pub fn legendre_p(ell: u32, mu: f64) -> f64 {
    match ell {
        0 => 1.0,
        1 => mu,
        _ => {
            let mut p0 = 1.0;
            let mut p1 = mu;
            for n in 2..=ell {
                let n = n as f64;
                let p2 = ((2.0 * n - 1.0) * mu * p1 - (n - 1.0) * p0) / n;
                p0 = p1;
                p1 = p2;
            }
            p1
        }
    }
}

/// Spherical Bessel function of the first kind j_ℓ(x), for x ≥ 0.
///
/// Upward recurrence from j₀ and j₁ is stable for x > ℓ. Below that the
/// power series is used; it converges for every x and only loses a digit or
/// so to cancellation in the x ≤ ℓ region where it is applied.
pub fn spherical_bessel_j(ell: u32, x: f64) -> f64 {
    let x = x.abs();
    if x == 0.0 {
        return if ell == 0 { 1.0 } else { 0.0 };
    }
    if x > ell as f64 {
        bessel_upward(ell, x)
    } else {
        bessel_series(ell, x)
    }
}

fn bessel_upward(ell: u32, x: f64) -> f64 {
    let (s, c) = x.sin_cos();
    let j0 = s / x;
    if ell == 0 {
        return j0;
    }
    let j1 = (s / x - c) / x;
    let mut j_prev = j0;
    let mut j_curr = j1;
    for n in 1..ell {
        // j_{n+1} = (2n+1)/x · j_n − j_{n−1}
        let j_next = (2 * n + 1) as f64 / x * j_curr - j_prev;
        j_prev = j_curr;
        j_curr = j_next;
    }
    j_curr
}

fn bessel_series(ell: u32, x: f64) -> f64 {
    // x^ℓ / (2ℓ+1)!!
    let mut prefactor = 1.0;
    for i in 1..=ell {
        prefactor *= x / (2 * i + 1) as f64;
    }
    let half_x2 = 0.5 * x * x;
    let mut term = 1.0_f64;
    let mut sum = 1.0_f64;
    for s in 1..200u32 {
        term *= -half_x2 / (s as f64 * (2 * (ell + s) + 1) as f64);
        sum += term;
        if term.abs() < 1e-17 * sum.abs() {
            break;
        }
    }
    prefactor * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legendre_known_values() {
        for &mu in &[-1.0_f64, -0.3, 0.0, 0.5, 1.0] {
            let p2 = 0.5 * (3.0 * mu * mu - 1.0);
            let p4 = (35.0 * mu.powi(4) - 30.0 * mu * mu + 3.0) / 8.0;
            assert!((legendre_p(0, mu) - 1.0).abs() < 1e-15);
            assert!((legendre_p(1, mu) - mu).abs() < 1e-15);
            assert!((legendre_p(2, mu) - p2).abs() < 1e-14, "P2({mu})");
            assert!((legendre_p(4, mu) - p4).abs() < 1e-14, "P4({mu})");
        }
        // P_ℓ(1) = 1 and P_ℓ(-1) = (-1)^ℓ
        for ell in 0..12 {
            assert!((legendre_p(ell, 1.0) - 1.0).abs() < 1e-13);
            let sign = if ell % 2 == 0 { 1.0 } else { -1.0 };
            assert!((legendre_p(ell, -1.0) - sign).abs() < 1e-13);
        }
    }

    #[test]
    fn test_bessel_closed_forms() {
        for &x in &[0.01_f64, 0.5, 1.0, 2.5, 7.0, 30.0, 250.0] {
            let (s, c) = f64::sin_cos(x);
            let j0 = s / x;
            let j1 = s / (x * x) - c / x;
            let j2 = (3.0 / (x * x) - 1.0) * s / x - 3.0 * c / (x * x);
            let scale = 1.0 / x.max(1.0);
            assert!((spherical_bessel_j(0, x) - j0).abs() < 1e-13 * scale.max(1e-3));
            assert!(
                (spherical_bessel_j(1, x) - j1).abs() < 1e-12,
                "j1({x}): got {}, expected {}",
                spherical_bessel_j(1, x),
                j1
            );
            // The closed form for j2 cancels badly at small x; compare there against
            // the leading series term instead.
            if x > 0.5 {
                assert!(
                    (spherical_bessel_j(2, x) - j2).abs() < 1e-12,
                    "j2({x}): got {}, expected {}",
                    spherical_bessel_j(2, x),
                    j2
                );
            } else {
                let x2 = x * x;
                let series = x2 / 15.0 * (1.0 - x2 / 14.0 + x2 * x2 / 504.0 - x2 * x2 * x2 / 33264.0);
                assert!((spherical_bessel_j(2, x) - series).abs() < 1e-8 * series);
            }
        }
    }

    #[test]
    fn test_bessel_origin_and_continuity() {
        assert_eq!(spherical_bessel_j(0, 0.0), 1.0);
        assert_eq!(spherical_bessel_j(3, 0.0), 0.0);
        // The series/recurrence switch at x = ℓ must be seamless.
        for ell in 1..8u32 {
            let x = ell as f64;
            let below = spherical_bessel_j(ell, x * (1.0 - 1e-12));
            let above = spherical_bessel_j(ell, x * (1.0 + 1e-12));
            assert!(
                (below - above).abs() < 1e-10 * below.abs().max(1e-3),
                "discontinuity at x = ell = {ell}: {below} vs {above}"
            );
        }
    }
}
