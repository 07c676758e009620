//! Correlation function of a distorted power spectrum.
//!
//! [`DistortedPowerCorrelation`] turns an isotropic power spectrum P(k) and a
//! distortion D(k, μ) into the correlation function ξ(r, μ):
//!
//! 1. The Legendre moments `P_ℓ(k) = P(k)·(2ℓ+1)/2 ∫ D(k,μ) L_ℓ(μ) dμ` are
//!    tabulated on a log-spaced k grid.
//! 2. Each moment is transformed to ξ_ℓ(r) on a linear r grid by an
//!    [`AdaptiveMultipoleTransform`] and splined.
//! 3. ξ(r, μ) is reassembled as `Σ_ℓ ξ_ℓ(r) L_ℓ(μ)`.
//!
//! `initialize` calibrates the per-multipole error budgets so that the
//! reassembled sum meets the requested accuracy: a loose first pass measures how
//! much each multipole contributes to the total, and the final pass gives the
//! dominant multipoles the tighter targets.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use xipole::{CorrelationConfig, DistortedPowerCorrelation, Distortion, InitializeConfig,
//!     KaiserDistortion, PowerLaw};
//!
//! let engine_config = CorrelationConfig {
//!     r_min: 20.0,
//!     r_max: 100.0,
//!     nr: 41,
//!     ..Default::default()
//! };
//! let mut xi = DistortedPowerCorrelation::new(
//!     Arc::new(PowerLaw::new(1.0, -2.0)),
//!     Arc::new(Distortion::Kaiser(KaiserDistortion::new(0.4))),
//!     &engine_config,
//! )?;
//! let accurate = xi.initialize(&InitializeConfig::default())?;
//! println!("{xi}");
//! println!("accurate: {accurate}, xi(50, 0.5) = {}", xi.correlation(50.0, 0.5)?);
//! # Ok::<(), xipole::Error>(())
//! ```

pub mod calibrate;
pub mod grids;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::distortion::DistortionFunction;
use crate::error::{Error, Result};
use crate::interpolate::CubicSpline;
use crate::power::{PowerSpectrum, TabulatedPower};
use crate::special::{legendre_p, GaussLegendre};
use crate::transform::{
    multipole_transform_normalization, AdaptiveMultipoleTransform, TransformKind,
};

pub use calibrate::BiggestContribution;
pub use grids::{MultipoleSet, SamplingGrids};

// ── Configuration ───────────────────────────────────────────────────────────

/// Sampling grids, multipoles and accuracy target of a correlation engine.
#[derive(Debug, Clone)]
pub struct CorrelationConfig {
    /// Lower end of the tabulated k range (h/Mpc). Default 1e-4.
    pub k_min: f64,
    /// Upper end of the tabulated k range (h/Mpc). Default 10.
    pub k_max: f64,
    /// Number of log-spaced k samples. Default 512.
    pub nk: usize,
    /// Smallest separation (Mpc/h). Default 1.
    pub r_min: f64,
    /// Largest separation (Mpc/h). Default 200.
    pub r_max: f64,
    /// Number of linearly spaced r samples. Default 200.
    pub nr: usize,
    /// Highest Legendre order carried. Default 4.
    pub ell_max: u32,
    /// Carry even orders only; requires even `ell_max`. Default true.
    pub symmetric: bool,
    /// Relative accuracy target of the reassembled ξ(r, μ). Default 1e-2.
    pub relerr: f64,
    /// Absolute accuracy target, scaled by `r^abspow`. Default 1e-5.
    pub abserr: f64,
    /// Power of r applied to `abserr`. Default 0.
    pub abspow: f64,
    /// Gauss-Legendre nodes for the angular integral over μ. Default 64.
    pub quadrature_order: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            k_min: 1e-4,
            k_max: 10.0,
            nk: 512,
            r_min: 1.0,
            r_max: 200.0,
            nr: 200,
            ell_max: 4,
            symmetric: true,
            relerr: 1e-2,
            abserr: 1e-5,
            abspow: 0.0,
            quadrature_order: 64,
        }
    }
}

impl CorrelationConfig {
    fn validate(&self) -> Result<()> {
        let fail = |what: String| {
            Err(Error::InvalidArgument(format!(
                "DistortedPowerCorrelation::new: {what}"
            )))
        };
        if !(self.k_min < self.k_max) {
            return fail(format!("expected k_min < k_max, got [{}, {}]", self.k_min, self.k_max));
        }
        if !(self.k_min > 0.0) {
            return fail(format!("expected k_min > 0, got {}", self.k_min));
        }
        if self.nk < 2 {
            return fail(format!("expected nk >= 2, got {}", self.nk));
        }
        if !(self.r_min < self.r_max) {
            return fail(format!("expected r_min < r_max, got [{}, {}]", self.r_min, self.r_max));
        }
        if !(self.r_min > 0.0) {
            return fail(format!("expected r_min > 0, got {}", self.r_min));
        }
        if self.nr < 2 {
            return fail(format!("expected nr >= 2, got {}", self.nr));
        }
        if self.symmetric && self.ell_max % 2 == 1 {
            return fail(format!("expected even ell_max when symmetric, got {}", self.ell_max));
        }
        if !(self.relerr > 0.0 && self.relerr.is_finite()) {
            return fail(format!("expected relerr > 0, got {}", self.relerr));
        }
        if !(self.abserr > 0.0 && self.abserr.is_finite()) {
            return fail(format!("expected abserr > 0, got {}", self.abserr));
        }
        if !self.abspow.is_finite() {
            return fail(format!("expected finite abspow, got {}", self.abspow));
        }
        if self.quadrature_order < 1 {
            return fail("expected quadrature_order >= 1".to_string());
        }
        Ok(())
    }
}

/// Parameters of the calibration run in [`DistortedPowerCorrelation::initialize`].
#[derive(Debug, Clone)]
pub struct InitializeConfig {
    /// μ samples in the calibration sweep (>= 2). Default 20.
    pub nmu: usize,
    /// Safety factor applied to the converged truncation parameter (>= 1). Default 2.
    pub margin: f64,
    /// Loosest truncation parameter tried (< 1). Default 0.1.
    pub veps_max: f64,
    /// Tightest truncation parameter tried (> 0). Default 1e-6.
    pub veps_min: f64,
    /// Reduce the final sampling density as far as accuracy allows. Default false.
    pub optimize: bool,
}

impl Default for InitializeConfig {
    fn default() -> Self {
        Self {
            nmu: 20,
            margin: 2.0,
            veps_max: 0.1,
            veps_min: 1e-6,
            optimize: false,
        }
    }
}

impl InitializeConfig {
    fn validate(&self) -> Result<()> {
        let fail = |what: String| {
            Err(Error::InvalidArgument(format!(
                "DistortedPowerCorrelation::initialize: {what}"
            )))
        };
        if self.nmu < 2 {
            return fail(format!("expected nmu >= 2, got {}", self.nmu));
        }
        if !(self.margin >= 1.0) {
            return fail(format!("expected margin >= 1, got {}", self.margin));
        }
        if !(self.veps_max > self.veps_min) {
            return fail(format!(
                "expected veps_max > veps_min, got veps_max = {}, veps_min = {}",
                self.veps_max, self.veps_min
            ));
        }
        if !(self.veps_min > 0.0) {
            return fail(format!("expected veps_min > 0, got {}", self.veps_min));
        }
        if !(self.veps_max < 1.0) {
            return fail(format!("expected veps_max < 1, got {}", self.veps_max));
        }
        Ok(())
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// Everything owned by one multipole order.
#[derive(Debug, Clone)]
struct MultipoleSlot {
    ell: u32,
    transformer: AdaptiveMultipoleTransform,
    /// ξ_ℓ on the r grid.
    xi: Vec<f64>,
    interpolator: Option<CubicSpline>,
    /// P_ℓ(k) tabulated on the k grid.
    saved_power: Option<TabulatedPower>,
    biggest: BiggestContribution,
}

/// ξ(r, μ) of `P(k)·D(k, μ)` by Legendre multipoles.
pub struct DistortedPowerCorrelation {
    power: Arc<dyn PowerSpectrum>,
    distortion: Arc<dyn DistortionFunction>,
    grids: SamplingGrids,
    multipoles: MultipoleSet,
    relerr: f64,
    abserr: f64,
    abspow: f64,
    quadrature: GaussLegendre,
    slots: Vec<MultipoleSlot>,
    initialized: bool,
}

impl DistortedPowerCorrelation {
    /// Build the grids and one provisional transform per multipole.
    ///
    /// Fails with [`Error::InvalidArgument`] if `config` is inconsistent; no
    /// work is done in that case. Nothing is transformed until
    /// [`initialize`](Self::initialize).
    pub fn new(
        power: Arc<dyn PowerSpectrum>,
        distortion: Arc<dyn DistortionFunction>,
        config: &CorrelationConfig,
    ) -> Result<Self> {
        config.validate()?;

        let grids = SamplingGrids::new(
            config.k_min,
            config.k_max,
            config.nk,
            config.r_min,
            config.r_max,
            config.nr,
        )?;
        let multipoles = MultipoleSet::new(config.ell_max, config.symmetric)?;
        let quadrature = GaussLegendre::new(config.quadrature_order)?;

        // Provisional budgets, replaced during calibration.
        let n = multipoles.len() as f64;
        let relerr = config.relerr / 10.0;
        let abserr = config.abserr / (2.0 * n);

        let slots = multipoles
            .ells()
            .map(|ell| {
                let coef = multipole_transform_normalization(ell, 3, 1)?;
                let transformer = AdaptiveMultipoleTransform::new(
                    TransformKind::SphericalBessel,
                    ell,
                    coef,
                    grids.r().to_vec(),
                    relerr,
                    abserr,
                    config.abspow,
                )?;
                Ok(MultipoleSlot {
                    ell,
                    transformer,
                    xi: vec![0.0; grids.r().len()],
                    interpolator: None,
                    saved_power: None,
                    biggest: BiggestContribution::default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "{} multipoles, k in [{:e}, {:e}] x {}, r in [{}, {}] x {}, min {} samples/decade",
            slots.len(),
            config.k_min,
            config.k_max,
            config.nk,
            config.r_min,
            config.r_max,
            config.nr,
            grids.min_samples_per_decade()
        );

        Ok(Self {
            power,
            distortion,
            grids,
            multipoles,
            relerr: config.relerr,
            abserr: config.abserr,
            abspow: config.abspow,
            quadrature,
            slots,
            initialized: false,
        })
    }

    /// `P(k)·D(k, μ)`, evaluated directly. Fails with [`Error::Domain`] unless
    /// `μ ∈ [-1, 1]`.
    pub fn power(&self, k: f64, mu: f64) -> Result<f64> {
        check_mu(mu)?;
        Ok(self.power.evaluate(k) * self.distortion.evaluate(k, mu))
    }

    /// Legendre moment `P(k)·(2ℓ+1)/2 ∫ D(k,μ) L_ℓ(μ) dμ`, by quadrature.
    pub fn power_multipole(&self, k: f64, ell: u32) -> Result<f64> {
        self.multipoles.index(ell)?;
        Ok(angular_multipole(
            &*self.power,
            &*self.distortion,
            &self.quadrature,
            k,
            ell,
        ))
    }

    /// Interpolated power multipole from the cache built during `initialize`
    /// (or `transform(true, _)`).
    pub fn saved_power_multipole(&self, k: f64, ell: u32) -> Result<f64> {
        let slot = &self.slots[self.multipoles.index(ell)?];
        let saved = slot.saved_power.as_ref().ok_or_else(|| {
            Error::NotInitialized(format!("power multipole ell = {ell} has not been tabulated"))
        })?;
        Ok(saved.evaluate(k))
    }

    /// Tabulate every power multipole on the k grid.
    pub(crate) fn tabulate_power_multipoles(&mut self) -> Result<()> {
        let power = &*self.power;
        let distortion = &*self.distortion;
        let quadrature = &self.quadrature;
        let k = self.grids.k();

        for_each_slot(&mut self.slots, |slot| {
            let p: Vec<f64> = k
                .iter()
                .map(|&ki| angular_multipole(power, distortion, quadrature, ki, slot.ell))
                .collect();
            slot.saved_power = Some(TabulatedPower::new(k, &p, true, true)?);
            Ok(true)
        })?;
        Ok(())
    }

    /// Calibrate the per-multipole error budgets and compute ξ_ℓ(r).
    ///
    /// Runs a loose transform of every multipole, sweeps the reassembled
    /// ξ(r, μ) to find each multipole's largest relative contribution, then
    /// re-runs every transform with its budget scaled by that contribution.
    /// Returns whether every final transform met its target; the engine is
    /// usable either way.
    pub fn initialize(&mut self, config: &InitializeConfig) -> Result<bool> {
        config.validate()?;
        let t0 = Instant::now();
        self.initialized = false;
        info!(
            "Initializing {} multipoles (nmu={}, margin={}, veps in [{:e}, {:e}], optimize={})",
            self.slots.len(),
            config.nmu,
            config.margin,
            config.veps_min,
            config.veps_max,
            config.optimize
        );

        self.tabulate_power_multipoles()?;

        let min_spd = self.grids.min_samples_per_decade();
        let r = self.grids.r();

        // ── Phase 1: provisional budgets ──
        let coarse = for_each_slot(&mut self.slots, |slot| {
            let MultipoleSlot {
                ell,
                transformer,
                xi,
                interpolator,
                saved_power,
                ..
            } = slot;
            let saved = tabulated(saved_power, *ell)?;
            let ok = transformer.initialize(
                |k| saved.evaluate(k),
                xi,
                min_spd,
                config.margin,
                config.veps_max,
                config.veps_min,
                false,
            )?;
            *interpolator = Some(CubicSpline::new(r.to_vec(), xi.clone())?);
            Ok(ok)
        })?;
        debug!("Provisional pass converged: {:?}", coarse);

        // ── Phase 2: calibration sweep ──
        let ells: Vec<u32> = self.slots.iter().map(|s| s.ell).collect();
        let splines = self
            .slots
            .iter()
            .map(|s| {
                s.interpolator.as_ref().ok_or_else(|| {
                    Error::NotInitialized(format!("multipole ell = {} has no interpolator", s.ell))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let mu = calibrate::mu_samples(config.nmu, self.multipoles.step());
        let biggest = calibrate::calibration_sweep(r, &mu, &ells, &splines, self.abserr, self.abspow);
        for (slot, b) in self.slots.iter_mut().zip(biggest) {
            debug!(
                "ell={}: biggest contribution {:.4} at r={}, mu={:.3}",
                slot.ell, b.rel, b.r, b.mu
            );
            slot.biggest = b;
        }

        // ── Phase 3: calibrated budgets ──
        let n = self.slots.len();
        let (relerr, abserr, abspow) = (self.relerr, self.abserr, self.abspow);
        let converged = for_each_slot(&mut self.slots, |slot| {
            let MultipoleSlot {
                ell,
                transformer,
                xi,
                interpolator,
                saved_power,
                biggest,
            } = slot;
            let (rel, abs) = calibrate::error_budget(relerr, abserr, n, biggest.rel);
            debug!("ell={}: budget relerr={:.3e}, abserr={:.3e}", ell, rel, abs);
            *transformer = AdaptiveMultipoleTransform::new(
                TransformKind::SphericalBessel,
                *ell,
                transformer.coefficient(),
                r.to_vec(),
                rel,
                abs,
                abspow,
            )?;
            let saved = tabulated(saved_power, *ell)?;
            let ok = transformer.initialize(
                |k| saved.evaluate(k),
                xi,
                min_spd,
                config.margin,
                config.veps_max,
                config.veps_min,
                config.optimize,
            )?;
            *interpolator = Some(CubicSpline::new(r.to_vec(), xi.clone())?);
            Ok(ok)
        })?;

        self.initialized = true;
        let accurate = converged.iter().all(|&ok| ok);
        if !accurate {
            let failed: Vec<u32> = self
                .slots
                .iter()
                .zip(&converged)
                .filter_map(|(s, &ok)| (!ok).then_some(s.ell))
                .collect();
            warn!("Multipoles {:?} did not reach their accuracy target", failed);
        }
        info!(
            "Initialized in {:.1} ms (accurate={})",
            t0.elapsed().as_secs_f64() * 1000.0,
            accurate
        );
        Ok(accurate)
    }

    /// Re-run every transform with the current budgets.
    ///
    /// With `interpolate_power_multipoles` the power-multipole cache is
    /// rebuilt and transformed; otherwise the exact multipoles are evaluated
    /// at every k sample. Returns whether every transform passed its accuracy
    /// check (always true with `bypass_termination_test`). Interpolators are
    /// rebuilt regardless.
    pub fn transform(
        &mut self,
        interpolate_power_multipoles: bool,
        bypass_termination_test: bool,
    ) -> Result<bool> {
        if interpolate_power_multipoles {
            self.tabulate_power_multipoles()?;
        }

        let power = &*self.power;
        let distortion = &*self.distortion;
        let quadrature = &self.quadrature;
        let r = self.grids.r();

        let accurate = for_each_slot(&mut self.slots, |slot| {
            let MultipoleSlot {
                ell,
                transformer,
                xi,
                interpolator,
                saved_power,
                ..
            } = slot;
            let ell = *ell;
            let ok = if interpolate_power_multipoles {
                let saved = tabulated(saved_power, ell)?;
                transformer.transform(|k| saved.evaluate(k), xi, bypass_termination_test)?
            } else {
                transformer.transform(
                    |k| angular_multipole(power, distortion, quadrature, k, ell),
                    xi,
                    bypass_termination_test,
                )?
            };
            *interpolator = Some(CubicSpline::new(r.to_vec(), xi.clone())?);
            Ok(ok)
        })?;

        let accurate = accurate.iter().all(|&ok| ok);
        if !accurate {
            warn!("transform: accuracy target not met");
        }
        Ok(accurate)
    }

    /// ξ_ℓ(r), splined from the r grid.
    pub fn correlation_multipole(&self, r: f64, ell: u32) -> Result<f64> {
        self.check_initialized()?;
        let index = self.multipoles.index(ell)?;
        self.check_r(r)?;
        Ok(interpolator(&self.slots[index])?.evaluate(r))
    }

    /// ξ(r, μ) = Σ_ℓ ξ_ℓ(r) L_ℓ(μ).
    pub fn correlation(&self, r: f64, mu: f64) -> Result<f64> {
        self.check_initialized()?;
        check_mu(mu)?;
        self.check_r(r)?;
        self.slots.iter().try_fold(0.0, |sum, slot| {
            Ok(sum + interpolator(slot)?.evaluate(r) * legendre_p(slot.ell, mu))
        })
    }

    /// The transform computing multipole `ell`.
    pub fn transformer(&self, ell: u32) -> Result<&AdaptiveMultipoleTransform> {
        Ok(&self.slots[self.multipoles.index(ell)?].transformer)
    }

    /// Calibration result for multipole `ell`.
    pub fn biggest_contribution(&self, ell: u32) -> Result<BiggestContribution> {
        self.check_initialized()?;
        Ok(self.slots[self.multipoles.index(ell)?].biggest)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn k_grid(&self) -> &[f64] {
        self.grids.k()
    }

    pub fn r_grid(&self) -> &[f64] {
        self.grids.r()
    }

    pub fn min_samples_per_decade(&self) -> u32 {
        self.grids.min_samples_per_decade()
    }

    pub fn multipoles(&self) -> MultipoleSet {
        self.multipoles
    }

    fn check_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized(
                "DistortedPowerCorrelation: call initialize() first".to_string(),
            ))
        }
    }

    fn check_r(&self, r: f64) -> Result<()> {
        let (r_min, r_max) = (self.grids.r_min(), self.grids.r_max());
        if r >= r_min && r <= r_max {
            Ok(())
        } else {
            Err(Error::Domain(format!("r = {r} outside [{r_min}, {r_max}]")))
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn check_mu(mu: f64) -> Result<()> {
    if (-1.0..=1.0).contains(&mu) {
        Ok(())
    } else {
        Err(Error::Domain(format!("mu = {mu} outside [-1, 1]")))
    }
}

/// Moments below this fraction of `∫|D| dμ` are quadrature roundoff.
const MULTIPOLE_ROUNDOFF: f64 = 1e-12;

/// `P(k)·(2ℓ+1)/2 ∫ D(k,μ) L_ℓ(μ) dμ`, flushed to zero at roundoff level so
/// that vanishing moments tabulate (and extrapolate) as exact zeros.
fn angular_multipole(
    power: &dyn PowerSpectrum,
    distortion: &dyn DistortionFunction,
    quadrature: &GaussLegendre,
    k: f64,
    ell: u32,
) -> f64 {
    let moment = quadrature.multipole(|mu| distortion.evaluate(k, mu), ell);
    let scale = quadrature.integrate(|mu| distortion.evaluate(k, mu).abs());
    if moment.abs() <= MULTIPOLE_ROUNDOFF * scale {
        return 0.0;
    }
    power.evaluate(k) * moment
}

fn tabulated(saved: &Option<TabulatedPower>, ell: u32) -> Result<&TabulatedPower> {
    saved.as_ref().ok_or_else(|| {
        Error::NotInitialized(format!("power multipole ell = {ell} has not been tabulated"))
    })
}

fn interpolator(slot: &MultipoleSlot) -> Result<&CubicSpline> {
    slot.interpolator.as_ref().ok_or_else(|| {
        Error::NotInitialized(format!("multipole ell = {} has not been transformed", slot.ell))
    })
}

/// Run `op` on every slot, in parallel with the `parallel` feature.
#[cfg(feature = "parallel")]
fn for_each_slot<F>(slots: &mut [MultipoleSlot], op: F) -> Result<Vec<bool>>
where
    F: Fn(&mut MultipoleSlot) -> Result<bool> + Send + Sync,
{
    use rayon::prelude::*;
    slots.par_iter_mut().map(op).collect()
}

/// Run `op` on every slot, in parallel with the `parallel` feature.
#[cfg(not(feature = "parallel"))]
fn for_each_slot<F>(slots: &mut [MultipoleSlot], op: F) -> Result<Vec<bool>>
where
    F: Fn(&mut MultipoleSlot) -> Result<bool>,
{
    slots.iter_mut().map(op).collect()
}

// ── Reporting ───────────────────────────────────────────────────────────────

impl fmt::Debug for DistortedPowerCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistortedPowerCorrelation")
            .field("grids", &self.grids)
            .field("multipoles", &self.multipoles)
            .field("relerr", &self.relerr)
            .field("abserr", &self.abserr)
            .field("abspow", &self.abspow)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DistortedPowerCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let k = self.grids.k();
        let r = self.grids.r();
        writeln!(
            f,
            "Using {} k-space points in [{:e}, {:e}] h/Mpc",
            k.len(),
            k[0],
            k[k.len() - 1]
        )?;
        writeln!(
            f,
            "Using {} r-space points in [{}, {}] Mpc/h",
            r.len(),
            self.grids.r_min(),
            self.grids.r_max()
        )?;
        writeln!(
            f,
            "Using {} {} multipoles up to ell = {}",
            self.multipoles.len(),
            if self.multipoles.is_symmetric() { "even" } else { "even+odd" },
            self.multipoles.ell_max()
        )?;
        for slot in &self.slots {
            let t = &slot.transformer;
            let b = &slot.biggest;
            write!(
                f,
                "  ell = {}: relerr = {:.2e} @(r = {:.1}, mu = {:.3}, rel = {:.4}), abserr = {:.2e}, abspow = {}",
                slot.ell,
                t.rel_err(),
                b.r,
                b.mu,
                b.rel,
                t.abs_err(),
                t.abs_pow()
            )?;
            match (t.veps(), t.k_min(), t.k_max(), t.num_samples(), t.samples_per_decade()) {
                (Some(veps), Some(k_min), Some(k_max), Some(nk), Some(spd)) => writeln!(
                    f,
                    ", veps = {veps:.2e}, k in [{k_min:.3e}, {k_max:.3e}], nk = {nk} ({spd:.0}/decade)"
                )?,
                _ => writeln!(f, ", not transformed")?,
            }
        }
        Ok(())
    }
}
