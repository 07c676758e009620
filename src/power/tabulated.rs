//! Power spectrum interpolated from tabulated samples.
//!
//! Used to cache expensive functions of k (the Legendre moments of
//! P(k)·D(k,μ)) on a fixed grid so that the adaptive transforms can sample them
//! freely.

use crate::error::{Error, Result};
use crate::interpolate::CubicSpline;

use super::PowerSpectrum;

/// How the tabulated values are splined.
#[derive(Debug, Clone)]
enum Scale {
    /// `ln|P|` vs `ln k`; all samples share `sign`.
    LogLog { sign: f64 },
    /// `P` vs `ln k`; samples change sign or touch zero.
    Linear,
}

/// Cubic-spline interpolation of `(k_i, P_i)` samples.
///
/// When every sample is non-zero and of one sign the spline is built in
/// log-log space, which reproduces power laws exactly. Otherwise `P` is
/// splined against `ln k`.
///
/// Outside the tabulated range the power is extrapolated as a power law
/// through the two end samples when the matching `extrapolate_*` flag is set
/// (and those samples are non-zero and of one sign); in every other case it is
/// taken to be zero there.
#[derive(Debug, Clone)]
pub struct TabulatedPower {
    spline: CubicSpline,
    scale: Scale,
    k_min: f64,
    k_max: f64,
    /// Power-law (amplitude, index) used below `k_min`, if extrapolating.
    below: Option<(f64, f64)>,
    /// Power-law (amplitude, index) used above `k_max`, if extrapolating.
    above: Option<(f64, f64)>,
}

impl TabulatedPower {
    /// Tabulate `p` at wavenumbers `k` (strictly increasing, positive).
    pub fn new(
        k: &[f64],
        p: &[f64],
        extrapolate_below: bool,
        extrapolate_above: bool,
    ) -> Result<Self> {
        if k.len() != p.len() {
            return Err(Error::InvalidArgument(format!(
                "TabulatedPower::new: {} k samples but {} power samples",
                k.len(),
                p.len()
            )));
        }
        if k.len() < 2 {
            return Err(Error::InvalidArgument(
                "TabulatedPower::new: expected at least 2 samples".to_string(),
            ));
        }
        if k[0] <= 0.0 {
            return Err(Error::InvalidArgument(
                "TabulatedPower::new: expected k > 0".to_string(),
            ));
        }

        let one_signed = p.iter().all(|&v| v > 0.0) || p.iter().all(|&v| v < 0.0);
        let log_k: Vec<f64> = k.iter().map(|v| v.ln()).collect();
        let (values, scale) = if one_signed {
            let sign = p[0].signum();
            (p.iter().map(|v| v.abs().ln()).collect(), Scale::LogLog { sign })
        } else {
            (p.to_vec(), Scale::Linear)
        };
        let spline = CubicSpline::new(log_k, values)?;

        let n = k.len();
        let below = if extrapolate_below {
            end_power_law(k[0], p[0], k[1], p[1])
        } else {
            None
        };
        let above = if extrapolate_above {
            end_power_law(k[n - 2], p[n - 2], k[n - 1], p[n - 1])
        } else {
            None
        };

        Ok(Self {
            spline,
            scale,
            k_min: k[0],
            k_max: k[n - 1],
            below,
            above,
        })
    }

    pub fn k_min(&self) -> f64 {
        self.k_min
    }

    pub fn k_max(&self) -> f64 {
        self.k_max
    }
}

impl PowerSpectrum for TabulatedPower {
    fn evaluate(&self, k: f64) -> f64 {
        if k < self.k_min {
            return self.below.map_or(0.0, |(a, n)| a * k.powf(n));
        }
        if k > self.k_max {
            return self.above.map_or(0.0, |(a, n)| a * k.powf(n));
        }
        let s = self.spline.evaluate(k.ln());
        match self.scale {
            Scale::LogLog { sign } => sign * s.exp(),
            Scale::Linear => s,
        }
    }
}

/// Power law through two samples, if they are non-zero and of one sign.
fn end_power_law(k0: f64, p0: f64, k1: f64, p1: f64) -> Option<(f64, f64)> {
    if p0 == 0.0 || p1 == 0.0 || p0.signum() != p1.signum() {
        return None;
    }
    let index = (p1 / p0).ln() / (k1 / k0).ln();
    let amplitude = p0 / k0.powf(index);
    Some((amplitude, index))
}
