//! Gauss–Legendre quadrature on [-1, 1].
//!
//! Nodes and weights come from the Golub–Welsch construction: the nodes are the
//! eigenvalues of the symmetric tridiagonal Jacobi matrix of the Legendre
//! recurrence, and each weight is twice the squared first component of the
//! corresponding normalized eigenvector.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::{Error, Result};

use super::legendre_p;

/// An n-point Gauss–Legendre rule, exact for polynomials of degree ≤ 2n−1.
#[derive(Debug, Clone)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Build the n-point rule. Fails with [`Error::InvalidArgument`] for n = 0.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidArgument(
                "GaussLegendre::new: expected at least one node".to_string(),
            ));
        }

        let mut jacobi = DMatrix::<f64>::zeros(n, n);
        for i in 1..n {
            let k = i as f64;
            let b = k / (4.0 * k * k - 1.0).sqrt();
            jacobi[(i - 1, i)] = b;
            jacobi[(i, i - 1)] = b;
        }

        let eig = SymmetricEigen::new(jacobi);
        let mut pairs: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let v0 = eig.eigenvectors[(0, i)];
                (eig.eigenvalues[i], 2.0 * v0 * v0)
            })
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (nodes, weights) = pairs.into_iter().unzip();
        Ok(Self { nodes, weights })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a rule has at least one node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Approximate ∫_{-1}^{1} f(μ) dμ.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }

    /// Legendre multipole of `f`: `(2ℓ+1)/2 ∫_{-1}^{1} f(μ) P_ℓ(μ) dμ`.
    ///
    /// With this normalization `f(μ) = Σ_ℓ multipole(f, ℓ) · P_ℓ(μ)`.
    pub fn multipole<F: Fn(f64) -> f64>(&self, f: F, ell: u32) -> f64 {
        let norm = (2 * ell + 1) as f64 / 2.0;
        norm * self.integrate(|mu| f(mu) * legendre_p(ell, mu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_rule() {
        assert!(matches!(
            GaussLegendre::new(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_three_point_rule() {
        let gl = GaussLegendre::new(3).unwrap();
        let x = (3.0_f64 / 5.0).sqrt();
        let expected_nodes = [-x, 0.0, x];
        let expected_weights = [5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0];
        for i in 0..3 {
            assert!((gl.nodes()[i] - expected_nodes[i]).abs() < 1e-13);
            assert!((gl.weights()[i] - expected_weights[i]).abs() < 1e-13);
        }
    }

    #[test]
    fn test_polynomial_exactness() {
        let gl = GaussLegendre::new(8).unwrap();
        let total: f64 = gl.weights().iter().sum();
        assert!((total - 2.0).abs() < 1e-13);
        // ∫ μ^14 dμ = 2/15, degree 14 ≤ 2·8−1
        let integral = gl.integrate(|mu| mu.powi(14));
        assert!(
            (integral - 2.0 / 15.0).abs() < 1e-13,
            "∫μ^14: got {integral}"
        );
        assert!(gl.integrate(|mu| mu.powi(7)).abs() < 1e-14);
    }

    #[test]
    fn test_multipoles_of_kaiser_factor() {
        let gl = GaussLegendre::new(64).unwrap();
        let beta: f64 = 0.6;
        let d = |mu: f64| (1.0 + beta * mu * mu).powi(2);
        let c0 = 1.0 + 2.0 * beta / 3.0 + beta * beta / 5.0;
        let c2 = 4.0 * beta / 3.0 + 4.0 * beta * beta / 7.0;
        let c4 = 8.0 * beta * beta / 35.0;
        assert!((gl.multipole(d, 0) - c0).abs() < 1e-12);
        assert!((gl.multipole(d, 1)).abs() < 1e-12);
        assert!((gl.multipole(d, 2) - c2).abs() < 1e-12);
        assert!((gl.multipole(d, 4) - c4).abs() < 1e-12);
        assert!((gl.multipole(d, 6)).abs() < 1e-12);
    }
}
