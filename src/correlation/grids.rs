//! Fixed sampling grids and the multipole index set.
//!
//! The k grid (log-spaced) is where power multipoles are tabulated; the r grid
//! (linear) is where correlation multipoles are computed and splined. Both are
//! built once, at construction, and never change.

use crate::error::{Error, Result};

/// The log-spaced k grid and linear r grid of a correlation engine.
#[derive(Debug, Clone)]
pub struct SamplingGrids {
    k: Vec<f64>,
    r: Vec<f64>,
    min_samples_per_decade: u32,
}

impl SamplingGrids {
    /// Build `nk` log-spaced wavenumbers on `[k_min, k_max]` and `nr` linearly
    /// spaced separations on `[r_min, r_max]`.
    ///
    /// Endpoints are pinned to the requested values so that range checks
    /// against them are exact.
    pub fn new(k_min: f64, k_max: f64, nk: usize, r_min: f64, r_max: f64, nr: usize) -> Result<Self> {
        if !(k_min > 0.0 && k_min < k_max && nk >= 2) {
            return Err(Error::InvalidArgument(format!(
                "SamplingGrids::new: expected 0 < k_min < k_max and nk >= 2, got [{k_min}, {k_max}] x {nk}"
            )));
        }
        if !(r_min > 0.0 && r_min < r_max && nr >= 2) {
            return Err(Error::InvalidArgument(format!(
                "SamplingGrids::new: expected 0 < r_min < r_max and nr >= 2, got [{r_min}, {r_max}] x {nr}"
            )));
        }

        let dk = (k_max / k_min).powf(1.0 / (nk - 1) as f64);
        let mut k: Vec<f64> = (0..nk).map(|i| k_min * dk.powi(i as i32)).collect();
        k[nk - 1] = k_max;

        let dr = (r_max - r_min) / (nr - 1) as f64;
        let mut r: Vec<f64> = (0..nr).map(|i| r_min + dr * i as f64).collect();
        r[nr - 1] = r_max;

        let min_samples_per_decade = (nk as f64 / (k_max / k_min).log10()).ceil() as u32;

        Ok(Self {
            k,
            r,
            min_samples_per_decade,
        })
    }

    pub fn k(&self) -> &[f64] {
        &self.k
    }

    pub fn r(&self) -> &[f64] {
        &self.r
    }

    pub fn r_min(&self) -> f64 {
        self.r[0]
    }

    pub fn r_max(&self) -> f64 {
        self.r[self.r.len() - 1]
    }

    /// Sampling density of the k grid, `ceil(nk / log10(k_max/k_min))`: the
    /// least density the adaptive transforms may use.
    pub fn min_samples_per_decade(&self) -> u32 {
        self.min_samples_per_decade
    }
}

/// The Legendre orders carried by an engine and their storage slots.
///
/// Orders run over `[0, ell_max]`; when `symmetric` only even orders are kept
/// and order ℓ lives in slot ℓ/2, otherwise in slot ℓ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipoleSet {
    ell_max: u32,
    symmetric: bool,
}

impl MultipoleSet {
    /// Fails with [`Error::InvalidArgument`] for odd `ell_max` when `symmetric`.
    pub fn new(ell_max: u32, symmetric: bool) -> Result<Self> {
        if symmetric && ell_max % 2 == 1 {
            return Err(Error::InvalidArgument(format!(
                "MultipoleSet::new: expected even ell_max when symmetric, got {ell_max}"
            )));
        }
        Ok(Self { ell_max, symmetric })
    }

    pub fn ell_max(&self) -> u32 {
        self.ell_max
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Spacing between carried orders: 2 when symmetric, else 1.
    pub fn step(&self) -> u32 {
        if self.symmetric {
            2
        } else {
            1
        }
    }

    /// Number of carried orders.
    pub fn len(&self) -> usize {
        (self.ell_max / self.step()) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether order `ell` is carried.
    pub fn contains(&self, ell: u32) -> bool {
        ell <= self.ell_max && (!self.symmetric || ell % 2 == 0)
    }

    /// Storage slot of order `ell`, or [`Error::Domain`] if it is not carried.
    pub fn index(&self, ell: u32) -> Result<usize> {
        if !self.contains(ell) {
            return Err(Error::Domain(format!(
                "invalid ell = {ell} (ell_max = {}, {})",
                self.ell_max,
                if self.symmetric { "even only" } else { "even+odd" }
            )));
        }
        Ok((ell / self.step()) as usize)
    }

    /// Carried orders in increasing order.
    pub fn ells(&self) -> impl Iterator<Item = u32> {
        (0..=self.ell_max).step_by(self.step() as usize)
    }
}
