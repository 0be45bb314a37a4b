//! Fixed-order Gauss-Legendre quadrature
//!
//! Nodes and weights on [-1, 1] are computed once per rule by Newton
//! iteration on the three-term Legendre recurrence, then mapped onto the
//! integration interval for each call. An n-point rule integrates
//! polynomials of degree up to 2n-1 exactly.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::interp::interp;

/// Convergence threshold on the Newton step for each root
const ROOT_TOLERANCE: f64 = 1e-14;

/// Newton iterations per root; convergence takes a handful.
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Gauss-Legendre rule of a fixed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussLegendre {
    /// Node positions on [-1, 1], ascending
    nodes: Vec<f64>,
    /// Weights matching `nodes`; they sum to 2
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Build the rule with `order` nodes.
    ///
    /// Returns an error for `order == 0`.
    pub fn new(order: usize) -> CoreResult<Self> {
        if order == 0 {
            return Err(CoreError::InvalidConfig(
                "quadrature order must be at least 1".to_string(),
            ));
        }
        Ok(Self::compute(order))
    }

    /// Compute the rule for a known-positive order
    pub(crate) fn compute(n: usize) -> Self {
        debug_assert!(n > 0);
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];

        // Roots are symmetric; find the positive half
        for i in 0..(n + 1) / 2 {
            let mut z = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();

            for _ in 0..MAX_NEWTON_ITERATIONS {
                let (p_n, p_prev) = legendre_pair(n, z);
                let step = p_n / legendre_derivative(n, z, p_n, p_prev);
                z -= step;
                if step.abs() < ROOT_TOLERANCE {
                    break;
                }
            }

            // Weight from the derivative at the converged root
            let (p_n, p_prev) = legendre_pair(n, z);
            let derivative = legendre_derivative(n, z, p_n, p_prev);
            let weight = 2.0 / ((1.0 - z * z) * derivative * derivative);
            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            weights[i] = weight;
            weights[n - 1 - i] = weight;
        }

        Self { nodes, weights }
    }

    /// Number of nodes
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes on [-1, 1]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`nodes`](Self::nodes)
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrate `f` over `[a, b]`
    pub fn integrate_fn<F>(&self, a: f64, b: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let mid = 0.5 * (b + a);
        let half = 0.5 * (b - a);
        let sum: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&node, &weight)| weight * f(mid + half * node))
            .sum();
        half * sum
    }

    /// Integrate a sampled curve over the span of its abscissae.
    ///
    /// The samples `(x, y)` must be ascending in `x`. The curve is linearly
    /// interpolated onto the nodes mapped to `[x[0], x[last]]`, so the result
    /// only depends on the samples and the rule order.
    pub fn integrate_samples(&self, x: &[f64], y: &[f64]) -> f64 {
        let (Some(&first), Some(&last)) = (x.first(), x.last()) else {
            return 0.0;
        };
        self.integrate_fn(first, last, |m| interp(m, x, y))
    }
}

/// Evaluate `(P_n(z), P_{n-1}(z))` by the upward recurrence
fn legendre_pair(n: usize, z: f64) -> (f64, f64) {
    let mut p_current = 1.0;
    let mut p_previous = 0.0;
    for j in 0..n {
        let p_older = p_previous;
        p_previous = p_current;
        p_current = ((2 * j + 1) as f64 * z * p_previous - j as f64 * p_older) / (j + 1) as f64;
    }
    (p_current, p_previous)
}

/// `P_n'(z)` from `P_n(z)` and `P_{n-1}(z)`
fn legendre_derivative(n: usize, z: f64, p_n: f64, p_prev: f64) -> f64 {
    n as f64 * (z * p_n - p_prev) / (z * z - 1.0)
}
