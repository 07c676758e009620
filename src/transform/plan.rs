//! Quadrature plan for one multipole transform.
//!
//! A plan fixes the k samples used to evaluate
//!
//! ```text
//! ξ_ℓ(r) = c_ℓ ∫ k² f(k) j_ℓ(kr) dk = c_ℓ ∫ k³ f(k) j_ℓ(kr) d ln k
//! ```
//!
//! on separations r ∈ [r_min, r_max]. Two parameters control it:
//!
//! - `veps` sets the truncation of the k range. In terms of v = kr the range
//!   runs from `v_min = veps^(1/(ℓ+1))` at r_max (below which the kernel
//!   k^(ℓ+…)·j_ℓ contributes at the veps level) up to `v_max = veps^(-1/2)` at
//!   r_min. The top of the range is rolled off with a raised-cosine taper over
//!   its last factor of two, which suppresses truncation ringing.
//! - `samples_per_decade` sets the density of the log-spaced k samples.
//!
//! The biased samples `h(k) = k^(3-q)·f(k)` are expanded in a discrete
//! Fourier series in ln k, zero-padded so the periodic images sit far outside
//! the sampled range. Each term `k^(q+iη)` has the closed-form transform
//!
//! ```text
//! ∫₀^∞ x^(s-1) j_ℓ(x) dx = √π 2^(s-2) Γ((ℓ+s)/2) / Γ((3+ℓ-s)/2),   -ℓ < Re s < 2
//! ```
//!
//! so only f needs resolving, never the oscillations of j_ℓ(kr). The series is
//! summed directly at each requested r. Repeating the expansion on every other
//! sample gives a coarse estimate; fine and coarse agreeing is the sampling
//! convergence test.

use std::f64::consts::{LN_10, LN_2, PI};

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::special::{ln_gamma, spherical_bessel_j};

/// The taper covers `[k_max / TAPER_RATIO, k_max]`.
pub const TAPER_RATIO: f64 = 2.0;

/// Power-law bias q: the Fourier series expands `k^(-q)·k³f(k)`.
pub const BIAS: f64 = 0.5;

/// The padded series period spans this many times the sampled ln k range.
const PADDING: usize = 3;

/// Smallest number of k samples in a plan.
const MIN_SAMPLES: usize = 4;

/// Sample positions and kernel moments for one (ℓ, veps, density) combination.
#[derive(Debug, Clone)]
pub struct TransformPlan {
    ell: u32,
    veps: f64,
    samples_per_decade: f64,
    /// Log-spaced wavenumbers starting at k_min.
    k: Vec<f64>,
    /// k^(3-q) × taper at each sample.
    weights: Vec<f64>,
    /// Padded series length for the full sample set.
    size: usize,
    /// Spacing of the Fourier frequencies η_m = m·eta_step.
    eta_step: f64,
    /// Kernel moments at s = q + iη_m for m in 0..size/2.
    moments: Vec<Complex64>,
}

/// Result of evaluating a plan at every target separation.
#[derive(Debug, Clone)]
pub(crate) struct PlanEvaluation {
    /// Transform using every sample.
    pub xi: Vec<f64>,
    /// Transform using every other sample.
    pub coarse: Vec<f64>,
    /// Size of the integrand at the low-k end, an estimate of the truncated
    /// contribution below k_min.
    pub edge: Vec<f64>,
}

impl TransformPlan {
    /// Build the plan for multipole `ell` on separations `[r_min, r_max]`.
    ///
    /// Requires `0 < veps < 1`, `samples_per_decade > 0` and `0 < r_min ≤ r_max`;
    /// callers validate these.
    pub fn new(ell: u32, r_min: f64, r_max: f64, veps: f64, samples_per_decade: f64) -> Self {
        let v_min = veps.powf(1.0 / (ell as f64 + 1.0));
        let v_max = veps.sqrt().recip();
        let k_lo = v_min / r_max;
        let k_hi = v_max / r_min;

        let step = LN_10 / samples_per_decade;
        let n = (((k_hi / k_lo).ln() / step).floor() as usize + 1).max(MIN_SAMPLES);
        let k: Vec<f64> = (0..n).map(|i| k_lo * (i as f64 * step).exp()).collect();

        let k_taper = k_hi / TAPER_RATIO;
        let weights = k
            .iter()
            .map(|&k| k.powf(3.0 - BIAS) * taper(k, k_taper, k_hi))
            .collect();

        let size = (PADDING * n).next_power_of_two();
        let eta_step = 2.0 * PI / (size as f64 * step);
        let moments = (0..size / 2)
            .map(|m| kernel_moment(ell, Complex64::new(BIAS, m as f64 * eta_step)))
            .collect();

        Self {
            ell,
            veps,
            samples_per_decade,
            k,
            weights,
            size,
            eta_step,
            moments,
        }
    }

    pub fn veps(&self) -> f64 {
        self.veps
    }

    pub fn samples_per_decade(&self) -> f64 {
        self.samples_per_decade
    }

    pub fn k_min(&self) -> f64 {
        self.k[0]
    }

    pub fn k_max(&self) -> f64 {
        self.k[self.k.len() - 1]
    }

    /// Number of k samples (function evaluations per transform).
    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    /// Transform `f` to every separation in `r`, with normalization `coef`.
    pub(crate) fn evaluate<F>(&self, coef: f64, r: &[f64], f: F) -> PlanEvaluation
    where
        F: Fn(f64) -> f64,
    {
        let fk: Vec<f64> = self.k.iter().map(|&k| f(k)).collect();
        let h: Vec<f64> = fk.iter().zip(&self.weights).map(|(&fv, &w)| w * fv).collect();

        let mut planner = FftPlanner::new();
        let fine = self.series(&mut planner, h.iter().copied(), self.size);
        let coarse = self.series(&mut planner, h.iter().step_by(2).copied(), self.size / 2);

        let k0 = self.k[0];
        let low_end = coef * k0 * k0 * k0 * fk[0];
        PlanEvaluation {
            xi: r.iter().map(|&r| coef * self.resum(&fine, r)).collect(),
            coarse: r.iter().map(|&r| coef * self.resum(&coarse, r)).collect(),
            edge: r
                .iter()
                .map(|&r| (low_end * spherical_bessel_j(self.ell, k0 * r)).abs())
                .collect(),
        }
    }

    /// Fourier coefficients of `samples` zero-padded to `n`, times the kernel
    /// moments: `y_m = c_m·U(q + iη_m)` for m in 0..n/2.
    fn series(
        &self,
        planner: &mut FftPlanner<f64>,
        samples: impl Iterator<Item = f64>,
        n: usize,
    ) -> Vec<Complex64> {
        let mut buf = vec![Complex64::new(0.0, 0.0); n];
        for (b, h) in buf.iter_mut().zip(samples) {
            b.re = h;
        }
        planner.plan_fft_forward(n).process(&mut buf);

        let scale = 1.0 / n as f64;
        buf.truncate(n / 2);
        for (c, &u) in buf.iter_mut().zip(&self.moments) {
            *c = *c * u * scale;
        }
        buf
    }

    /// `r^(-q)·[y_0 + 2 Re Σ_{m≥1} y_m (k_0 r)^(-iη_m)]`, the Nyquist term dropped.
    fn resum(&self, coefficients: &[Complex64], r: f64) -> f64 {
        let z = Complex64::from_polar(1.0, -self.eta_step * (self.k[0] * r).ln());
        let mut acc = Complex64::new(0.0, 0.0);
        for &y in coefficients[1..].iter().rev() {
            acc = acc * z + y;
        }
        (coefficients[0].re + 2.0 * (acc * z).re) * r.powf(-BIAS)
    }
}

/// Mellin transform of j_ℓ: `∫₀^∞ x^(s-1) j_ℓ(x) dx` for `-ℓ < Re s < 2`.
fn kernel_moment(ell: u32, s: Complex64) -> Complex64 {
    let l = ell as f64;
    let ratio = (ln_gamma((s + l) * 0.5) - ln_gamma((3.0 + l - s) * 0.5)).exp();
    ratio * ((s - 2.0) * LN_2).exp() * PI.sqrt()
}

/// Raised-cosine roll-off in ln k from 1 at `k_start` to 0 at `k_end`.
fn taper(k: f64, k_start: f64, k_end: f64) -> f64 {
    if k <= k_start {
        return 1.0;
    }
    if k >= k_end {
        return 0.0;
    }
    let t = (k / k_start).ln() / (k_end / k_start).ln();
    0.5 * (1.0 + (PI * t).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_log_uniform_and_spans_range() {
        let plan = TransformPlan::new(0, 10.0, 100.0, 1e-3, 32.0);
        let ratio = 10f64.powf(1.0 / 32.0);
        assert!(plan.k.windows(2).all(|w| (w[1] / w[0] - ratio).abs() < 1e-12));
        assert!((plan.k_min() - 1e-3 / 100.0).abs() < 1e-18);
        let k_hi = 1e-3_f64.sqrt().recip() / 10.0;
        assert!(plan.k_max() <= k_hi * (1.0 + 1e-12));
        assert!(plan.k_max() * ratio > k_hi);
        assert_eq!(plan.len(), plan.weights.len());
        assert!(plan.size >= PADDING * plan.len() && plan.size.is_power_of_two());
        assert_eq!(plan.moments.len(), plan.size / 2);
    }

    #[test]
    fn test_weights_are_tapered_powers() {
        let plan = TransformPlan::new(2, 5.0, 50.0, 1e-4, 40.0);
        let k_taper = plan.k_max() / TAPER_RATIO;
        for (&k, &w) in plan.k.iter().zip(&plan.weights) {
            let full = k.powf(3.0 - BIAS);
            if k * (1.0 + 1e-9) < k_taper {
                assert!((w - full).abs() <= 1e-14 * full, "k={k}");
            } else {
                assert!(w <= full && w >= 0.0, "k={k}");
            }
        }
    }

    #[test]
    fn test_tiny_ranges_keep_a_coarse_rule() {
        let plan = TransformPlan::new(4, 1.0, 1.0, 0.1, 1.0);
        assert_eq!(plan.len(), MIN_SAMPLES);
    }

    #[test]
    fn test_taper_shape() {
        assert_eq!(taper(0.5, 1.0, 2.0), 1.0);
        assert_eq!(taper(2.0, 1.0, 2.0), 0.0);
        assert!((taper(2f64.sqrt(), 1.0, 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kernel_moments() {
        let one = Complex64::new(1.0, 0.0);
        // ∫ j₀ = π/2, ∫ j₁ = 1, ∫ j₂ = π/4
        assert!((kernel_moment(0, one) - PI / 2.0).norm() < 1e-12);
        assert!((kernel_moment(1, one) - 1.0).norm() < 1e-12);
        assert!((kernel_moment(2, one) - PI / 4.0).norm() < 1e-12);
        // ∫ x^(-1/2) sin x dx = Γ(1/2)·sin(π/4)
        let half = Complex64::new(1.5, 0.0);
        assert!((kernel_moment(0, half) - (PI / 2.0).sqrt()).norm() < 1e-12);
        // Real f gives conjugate moments at ±η.
        let s = Complex64::new(BIAS, 7.3);
        assert!((kernel_moment(3, s.conj()) - kernel_moment(3, s).conj()).norm() < 1e-13);
    }

    #[test]
    fn test_power_law_transform() {
        // f = k^-2 ⇒ ξ₀(r) = c₀ ∫ sin(kr)/(kr) dk = c₀·π/(2r).
        let r: Vec<f64> = (0..5).map(|i| 20.0 + 20.0 * i as f64).collect();
        let plan = TransformPlan::new(0, 20.0, 100.0, 1e-5, 128.0);
        let eval = plan.evaluate(1.0, &r, |k| 1.0 / (k * k));
        for (&rj, (&xi, &coarse)) in r.iter().zip(eval.xi.iter().zip(&eval.coarse)) {
            let expected = PI / (2.0 * rj);
            assert!(
                ((xi - expected) / expected).abs() < 2e-3,
                "r={rj}: got {xi}, expected {expected}"
            );
            assert!(((coarse - expected) / expected).abs() < 1e-2, "r={rj}: coarse {coarse}");
        }
        assert!(eval.edge.iter().all(|&e| e >= 0.0));
    }

    #[test]
    fn test_quadrupole_of_gaussian_power() {
        // ∫ k⁴ e^(-k²) j₂(kr) dk = (√π/16)·r²·e^(-r²/4)
        let r = [1.0_f64, 2.0, 3.0];
        let plan = TransformPlan::new(2, 1.0, 3.0, 1e-8, 64.0);
        let eval = plan.evaluate(1.0, &r, |k| k * k * (-k * k).exp());
        for (&rj, &xi) in r.iter().zip(&eval.xi) {
            let expected = PI.sqrt() / 16.0 * rj * rj * (-rj * rj / 4.0).exp();
            assert!(
                (xi - expected).abs() < 1e-5 * expected,
                "r={rj}: got {xi}, expected {expected}"
            );
        }
    }
}
