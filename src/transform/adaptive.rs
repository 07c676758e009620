//! Adaptive spherical-Bessel transform of a single multipole.
//!
//! `initialize` searches for a [`TransformPlan`] whose result meets the
//! configured error target: the sample density is doubled until fine and coarse
//! quadratures agree, and the truncation parameter veps is halved until two
//! successive results agree. `transform` then re-evaluates that plan for any
//! function of k, optionally re-checking accuracy.

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::plan::{PlanEvaluation, TransformPlan};
use super::{Tolerance, TransformKind};

/// Upper limit on the sampling density explored by `initialize`.
pub const MAX_SAMPLES_PER_DECADE: f64 = 8192.0;

/// One multipole's k → r transform onto a fixed set of separations.
#[derive(Debug, Clone)]
pub struct AdaptiveMultipoleTransform {
    kind: TransformKind,
    ell: u32,
    coef: f64,
    r: Vec<f64>,
    tolerance: Tolerance,
    plan: Option<TransformPlan>,
}

impl AdaptiveMultipoleTransform {
    /// Create a transform of order `ell` with normalization `coef` onto the
    /// separations `r` (non-empty, positive, strictly increasing).
    ///
    /// A result ξ(r) is accurate when its error is within
    /// `max(relerr·|ξ(r)|, abserr·r^abspow)`.
    pub fn new(
        kind: TransformKind,
        ell: u32,
        coef: f64,
        r: Vec<f64>,
        relerr: f64,
        abserr: f64,
        abspow: f64,
    ) -> Result<Self> {
        if r.is_empty() {
            return Err(Error::InvalidArgument(
                "AdaptiveMultipoleTransform::new: expected at least one r sample".to_string(),
            ));
        }
        if r[0] <= 0.0 || r.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidArgument(
                "AdaptiveMultipoleTransform::new: r samples must be positive and increasing"
                    .to_string(),
            ));
        }
        if !(relerr > 0.0 && relerr.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "AdaptiveMultipoleTransform::new: expected relerr > 0, got {relerr}"
            )));
        }
        if !(abserr > 0.0 && abserr.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "AdaptiveMultipoleTransform::new: expected abserr > 0, got {abserr}"
            )));
        }
        Ok(Self {
            kind,
            ell,
            coef,
            r,
            tolerance: Tolerance {
                relerr,
                abserr,
                abspow,
            },
            plan: None,
        })
    }

    /// Search for a plan meeting the error target and transform `f` with it.
    ///
    /// Writes ξ_ℓ at every r sample into `out` and returns whether both the
    /// sampling and the truncation searches converged. A `false` result still
    /// leaves the best plan found in place.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize<F>(
        &mut self,
        f: F,
        out: &mut [f64],
        min_samples_per_decade: u32,
        margin: f64,
        veps_max: f64,
        veps_min: f64,
        optimize: bool,
    ) -> Result<bool>
    where
        F: Fn(f64) -> f64,
    {
        if min_samples_per_decade < 1 {
            return Err(Error::InvalidArgument(
                "AdaptiveMultipoleTransform::initialize: expected min_samples_per_decade >= 1"
                    .to_string(),
            ));
        }
        if margin < 1.0 {
            return Err(Error::InvalidArgument(
                "AdaptiveMultipoleTransform::initialize: expected margin >= 1".to_string(),
            ));
        }
        if !(veps_min > 0.0 && veps_min < veps_max && veps_max < 1.0) {
            return Err(Error::InvalidArgument(format!(
                "AdaptiveMultipoleTransform::initialize: expected 0 < veps_min < veps_max < 1, \
                 got veps_min = {veps_min}, veps_max = {veps_max}"
            )));
        }
        self.check_output(out)?;

        let min_spd = min_samples_per_decade as f64;
        let mut spd = min_spd;

        // ── Truncation: halve veps until successive results agree ──
        let mut veps = veps_max;
        let (mut plan, mut eval, mut sampled) = self.sample(&f, veps, &mut spd);
        let mut truncated = false;
        while veps > veps_min {
            let next_veps = (veps / 2.0).max(veps_min);
            let (next_plan, next_eval, next_sampled) = self.sample(&f, next_veps, &mut spd);
            let agree = self.tolerance.accepts(&self.r, &next_eval.xi, &eval.xi);
            debug!(
                "ell={} veps {:.3e} -> {:.3e}: {} samples ({:.0}/decade), agree={}",
                self.ell,
                veps,
                next_veps,
                next_plan.len(),
                spd,
                agree
            );
            plan = next_plan;
            eval = next_eval;
            sampled = next_sampled;
            veps = next_veps;
            if agree {
                truncated = true;
                break;
            }
        }

        // ── Safety margin on the converged truncation ──
        if margin > 1.0 {
            let target = (veps / margin).max(veps_min);
            if target < veps {
                (plan, eval, sampled) = self.sample(&f, target, &mut spd);
                veps = target;
            }
        }

        // ── Optional: drop density while the result stays within tolerance ──
        if optimize {
            while spd / 2.0 >= min_spd {
                let candidate =
                    TransformPlan::new(self.ell, self.r_min(), self.r_max(), veps, spd / 2.0);
                let trial = candidate.evaluate(self.coef, &self.r, &f);
                let keeps_result = self.tolerance.accepts(&self.r, &eval.xi, &trial.xi);
                let still_sampled = self.tolerance.accepts(&self.r, &trial.xi, &trial.coarse);
                if !(keeps_result && still_sampled) {
                    break;
                }
                spd /= 2.0;
                plan = candidate;
                eval = trial;
            }
        }

        let converged = truncated && sampled;
        if converged {
            debug!(
                "ell={} initialized: veps={:.3e}, k=[{:.3e}, {:.3e}], {} samples ({:.0}/decade)",
                self.ell,
                veps,
                plan.k_min(),
                plan.k_max(),
                plan.len(),
                plan.samples_per_decade()
            );
        } else {
            warn!(
                "ell={} transform did not converge (truncation={}, sampling={}) at veps={:.3e}, {:.0} samples/decade",
                self.ell, truncated, sampled, veps, spd
            );
        }

        out.copy_from_slice(&eval.xi);
        self.plan = Some(plan);
        Ok(converged)
    }

    /// Transform `f` with the plan chosen by [`initialize`](Self::initialize).
    ///
    /// Writes ξ_ℓ into `out`. Returns `true` when `bypass_termination_test` is
    /// set; otherwise returns whether the sampling check and the low-k
    /// truncation estimate both meet the error target at every r.
    pub fn transform<F>(&self, f: F, out: &mut [f64], bypass_termination_test: bool) -> Result<bool>
    where
        F: Fn(f64) -> f64,
    {
        let plan = self.plan.as_ref().ok_or_else(|| {
            Error::NotInitialized(format!(
                "AdaptiveMultipoleTransform::transform: ell = {} has no plan",
                self.ell
            ))
        })?;
        self.check_output(out)?;

        let eval = plan.evaluate(self.coef, &self.r, &f);
        out.copy_from_slice(&eval.xi);
        if bypass_termination_test {
            return Ok(true);
        }
        Ok(self.is_terminated(&eval))
    }

    fn is_terminated(&self, eval: &PlanEvaluation) -> bool {
        let sampled = self.tolerance.accepts(&self.r, &eval.xi, &eval.coarse);
        let truncated = self
            .r
            .iter()
            .zip(eval.xi.iter().zip(&eval.edge))
            .all(|(&r, (&xi, &edge))| edge <= self.tolerance.at(r, xi));
        sampled && truncated
    }

    /// Build and evaluate the plan for `veps`, doubling `spd` until fine and
    /// coarse quadratures agree or the density cap is reached.
    fn sample<F>(&self, f: &F, veps: f64, spd: &mut f64) -> (TransformPlan, PlanEvaluation, bool)
    where
        F: Fn(f64) -> f64,
    {
        loop {
            let plan = TransformPlan::new(self.ell, self.r_min(), self.r_max(), veps, *spd);
            let eval = plan.evaluate(self.coef, &self.r, f);
            let ok = self.tolerance.accepts(&self.r, &eval.xi, &eval.coarse);
            if ok || *spd >= MAX_SAMPLES_PER_DECADE {
                return (plan, eval, ok);
            }
            *spd = (*spd * 2.0).min(MAX_SAMPLES_PER_DECADE);
        }
    }

    fn check_output(&self, out: &[f64]) -> Result<()> {
        if out.len() != self.r.len() {
            return Err(Error::InvalidArgument(format!(
                "AdaptiveMultipoleTransform: output has {} slots for {} r samples",
                out.len(),
                self.r.len()
            )));
        }
        Ok(())
    }

    fn r_min(&self) -> f64 {
        self.r[0]
    }

    fn r_max(&self) -> f64 {
        self.r[self.r.len() - 1]
    }

    // ── Accessors ──

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn ell(&self) -> u32 {
        self.ell
    }

    pub fn coefficient(&self) -> f64 {
        self.coef
    }

    pub fn r(&self) -> &[f64] {
        &self.r
    }

    pub fn rel_err(&self) -> f64 {
        self.tolerance.relerr
    }

    pub fn abs_err(&self) -> f64 {
        self.tolerance.abserr
    }

    pub fn abs_pow(&self) -> f64 {
        self.tolerance.abspow
    }

    pub fn is_initialized(&self) -> bool {
        self.plan.is_some()
    }

    /// Truncation parameter of the current plan.
    pub fn veps(&self) -> Option<f64> {
        self.plan.as_ref().map(TransformPlan::veps)
    }

    /// Smallest k sampled by the current plan.
    pub fn k_min(&self) -> Option<f64> {
        self.plan.as_ref().map(TransformPlan::k_min)
    }

    /// Largest k sampled by the current plan.
    pub fn k_max(&self) -> Option<f64> {
        self.plan.as_ref().map(TransformPlan::k_max)
    }

    /// Number of k samples in the current plan.
    pub fn num_samples(&self) -> Option<usize> {
        self.plan.as_ref().map(TransformPlan::len)
    }

    /// Logarithmic sampling density of the current plan.
    pub fn samples_per_decade(&self) -> Option<f64> {
        self.plan.as_ref().map(TransformPlan::samples_per_decade)
    }
}
