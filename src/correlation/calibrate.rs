//! Error-budget calibration across multipoles.
//!
//! After a first, loosely-budgeted pass, the reassembled correlation
//! `ξ(r, μ) = Σ_ℓ ξ_ℓ(r) P_ℓ(μ)` is swept over the r grid and a set of μ
//! samples. For each multipole the sweep records where its term is the largest
//! fraction of the total. A multipole that never dominates can be computed
//! more loosely than one that does, and [`error_budget`] turns that fraction
//! into per-multipole error targets.

use crate::interpolate::CubicSpline;
use crate::special::legendre_p;

/// Where one multipole contributes most, relative to the total ξ(r, μ).
///
/// `rel = |ξ_ℓ(r) P_ℓ(μ)| / |ξ(r, μ)|` at the recorded `(r, mu)`. It can
/// exceed 1 when terms cancel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiggestContribution {
    pub r: f64,
    pub mu: f64,
    pub rel: f64,
}

/// μ samples for the sweep: `μ_i = 1 − i·dμ`, `dμ = 2 / step / (nmu − 1)`.
///
/// With `step = 1` they cover [-1, 1]; with `step = 2` (even multipoles only,
/// where ξ(r, μ) = ξ(r, −μ)) they cover [0, 1].
pub fn mu_samples(nmu: usize, step: u32) -> Vec<f64> {
    if nmu < 2 {
        return vec![1.0];
    }
    let dmu = 2.0 / step as f64 / (nmu - 1) as f64;
    (0..nmu).map(|i| 1.0 - i as f64 * dmu).collect()
}

/// Sweep `(r, μ)` and find each multipole's biggest relative contribution.
///
/// `ells[i]` is the order splined by `interpolators[i]`. Points where the
/// total |ξ(r, μ)| is below `abserr·r^abspow` are negligible and skipped.
pub fn calibration_sweep(
    r_grid: &[f64],
    mu: &[f64],
    ells: &[u32],
    interpolators: &[&CubicSpline],
    abserr: f64,
    abspow: f64,
) -> Vec<BiggestContribution> {
    let n = ells.len().min(interpolators.len());
    let legendre: Vec<Vec<f64>> = mu
        .iter()
        .map(|&m| ells[..n].iter().map(|&ell| legendre_p(ell, m)).collect())
        .collect();

    let mut biggest = vec![BiggestContribution::default(); n];
    let mut xi = vec![0.0; n];
    let mut terms = vec![0.0; n];

    for &r in r_grid {
        for (x, spline) in xi.iter_mut().zip(interpolators) {
            *x = spline.evaluate(r);
        }
        let negligible = abserr * r.powf(abspow);

        for (&m, p) in mu.iter().zip(&legendre) {
            let mut total = 0.0_f64;
            for i in 0..n {
                terms[i] = xi[i] * p[i];
                total += terms[i];
            }
            if total.abs() < negligible {
                continue;
            }
            for i in 0..n {
                let rel = (terms[i] / total).abs();
                if rel > biggest[i].rel {
                    biggest[i] = BiggestContribution { r, mu: m, rel };
                }
            }
        }
    }
    biggest
}

/// Per-multipole `(relerr, abserr)` targets for `n` multipoles, given the
/// multipole's biggest relative contribution `maxfrac`.
///
/// The absolute target is shared evenly. The relative target is shared evenly
/// and then loosened by `1/maxfrac`, so a multipole whose term is at most a
/// fraction of the total only has to be accurate relative to that fraction.
/// A multipole that never contributed (`maxfrac == 0`) gets the even share.
pub fn error_budget(relerr: f64, abserr: f64, n: usize, maxfrac: f64) -> (f64, f64) {
    let n = n.max(1) as f64;
    let rel = if maxfrac > 0.0 {
        relerr / n / maxfrac
    } else {
        relerr / n
    };
    (rel, abserr / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64, r: &[f64]) -> CubicSpline {
        CubicSpline::new(r.to_vec(), vec![value; r.len()]).unwrap()
    }

    #[test]
    fn test_mu_samples() {
        let full = mu_samples(5, 1);
        assert_eq!(full.len(), 5);
        assert_eq!(full[0], 1.0);
        assert!((full[4] + 1.0).abs() < 1e-15);

        let half = mu_samples(3, 2);
        assert_eq!(half, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_single_multipole_dominates() {
        let r = [10.0, 20.0, 30.0];
        let xi0 = constant(2.0, &r);
        let big = calibration_sweep(&r, &mu_samples(4, 2), &[0], &[&xi0], 1e-8, 0.0);
        assert_eq!(big.len(), 1);
        assert!((big[0].rel - 1.0).abs() < 1e-12);
        assert_eq!(big[0].r, 10.0);
        assert_eq!(big[0].mu, 1.0);
    }

    #[test]
    fn test_relative_contributions() {
        // ξ = 1 + 0.5·P₂(μ): at μ = 1 the quadrupole term is 0.5 of 1.5.
        let r = [10.0, 20.0];
        let xi0 = constant(1.0, &r);
        let xi2 = constant(0.5, &r);
        let big = calibration_sweep(&r, &[1.0], &[0, 2], &[&xi0, &xi2], 1e-8, 0.0);
        assert!((big[0].rel - 1.0 / 1.5).abs() < 1e-12);
        assert!((big[1].rel - 0.5 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_negligible_totals_are_skipped() {
        // Terms cancel exactly at μ = 1; only μ = 0 counts. A spline needs
        // two knots even when the sweep visits a single radius.
        let knots = [10.0, 20.0];
        let r = [10.0];
        let xi0 = constant(1.0, &knots);
        let xi2 = constant(-1.0, &knots);
        let big = calibration_sweep(&r, &[1.0, 0.0], &[0, 2], &[&xi0, &xi2], 1e-6, 0.0);
        // At μ = 0: P₂ = −1/2, total = 1.5.
        assert!((big[0].rel - 1.0 / 1.5).abs() < 1e-12);
        assert_eq!(big[0].mu, 0.0);
        assert_eq!(big[0].r, 10.0);

        let all_small = constant(1e-9, &knots);
        let none = calibration_sweep(&r, &[1.0], &[0], &[&all_small], 1e-6, 0.0);
        assert_eq!(none[0], BiggestContribution::default());
    }

    #[test]
    fn test_error_budget() {
        let (rel, abs) = error_budget(1e-2, 1e-4, 2, 0.5);
        assert!((rel - 1e-2).abs() < 1e-15);
        assert!((abs - 5e-5).abs() < 1e-18);

        let (rel, _) = error_budget(1e-2, 1e-4, 2, 0.0);
        assert!((rel - 5e-3).abs() < 1e-15);
    }
}
