//! Cubic-spline interpolation of tabulated samples.
//!
//! [`CubicSpline`] is the interpolation facility behind both the r-space
//! correlation multipoles and the k-space tabulated power multipoles.

use crate::error::{Error, Result};

/// Natural cubic spline through `(x_i, y_i)`.
///
/// Second derivatives vanish at both ends. Evaluation outside `[x_min, x_max]`
/// continues the cubic of the nearest end segment; callers that need a strict
/// domain check it themselves.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build a spline. Requires at least two points, equal lengths, finite
    /// values and strictly increasing `x`.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::InvalidArgument(format!(
                "CubicSpline::new: {} x samples but {} y samples",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(Error::InvalidArgument(
                "CubicSpline::new: expected at least 2 samples".to_string(),
            ));
        }
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument(
                "CubicSpline::new: samples must be finite".to_string(),
            ));
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidArgument(
                "CubicSpline::new: x samples must be strictly increasing".to_string(),
            ));
        }

        let m = natural_second_derivatives(&x, &y);
        Ok(Self { x, y, m })
    }

    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Evaluate the spline at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - x) / h;
        let b = (x - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    /// Index of the segment `[x_i, x_{i+1}]` used for `x`, clamped to the end segments.
    fn segment(&self, x: f64) -> usize {
        let n = self.x.len();
        // First knot strictly greater than x, then step back one.
        let upper = self.x.partition_point(|&xi| xi <= x);
        upper.saturating_sub(1).min(n - 2)
    }
}

/// Solve the tridiagonal system for natural-spline second derivatives
/// (Thomas algorithm).
fn natural_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    // Interior equations i = 1..n-2:
    // h_{i-1} m_{i-1} + 2(h_{i-1}+h_i) m_i + h_i m_{i+1} = 6 (s_i − s_{i−1})
    let mut diag = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    let mut upper = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        diag[i] = 2.0 * (h0 + h1);
        upper[i] = h1;
        rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
    }

    // Forward elimination (m_0 = 0 so the first row has no lower term).
    for i in 2..n - 1 {
        let lower = x[i] - x[i - 1];
        let w = lower / diag[i - 1];
        diag[i] -= w * upper[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }

    // Back substitution (m_{n-1} = 0).
    for i in (1..n - 1).rev() {
        m[i] = (rhs[i] - upper[i] * m[i + 1]) / diag[i];
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_samples() {
        assert!(CubicSpline::new(vec![0.0], vec![1.0]).is_err());
        assert!(CubicSpline::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(CubicSpline::new(vec![0.0, 0.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
        assert!(CubicSpline::new(vec![0.0, 1.0], vec![f64::NAN, 2.0]).is_err());
    }

    #[test]
    fn test_passes_through_knots() {
        let x: Vec<f64> = (0..12).map(|i| 0.3 * i as f64 + 0.01 * (i * i) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let spline = CubicSpline::new(x.clone(), y.clone()).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert!(
                (spline.evaluate(*xi) - yi).abs() < 1e-14,
                "knot {xi}: got {}, expected {}",
                spline.evaluate(*xi),
                yi
            );
        }
    }

    #[test]
    fn test_reproduces_linear_data_exactly() {
        let x = vec![1.0, 2.0, 4.0, 5.0, 9.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 2.0 * v).collect();
        let spline = CubicSpline::new(x, y).unwrap();
        for &t in &[1.0_f64, 1.5, 3.3, 7.0, 9.0] {
            assert!((spline.evaluate(t) - (3.0 - 2.0 * t)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smooth_function_accuracy() {
        let n = 101;
        let x: Vec<f64> = (0..n).map(|i| i as f64 * std::f64::consts::PI / (n - 1) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let spline = CubicSpline::new(x, y).unwrap();
        // sin'' vanishes at 0 and π, so the natural end conditions are exact.
        for i in 0..200 {
            let t = 0.5 + i as f64 * 0.01;
            assert!(
                (spline.evaluate(t) - t.sin()).abs() < 1e-7,
                "sin({t}): got {}",
                spline.evaluate(t)
            );
        }
    }

    #[test]
    fn test_two_points_is_linear() {
        let spline = CubicSpline::new(vec![0.0, 2.0], vec![1.0, 5.0]).unwrap();
        assert!((spline.evaluate(0.5) - 2.0).abs() < 1e-15);
        assert_eq!(spline.x_min(), 0.0);
        assert_eq!(spline.x_max(), 2.0);
    }
}
