// ============================================================
// Layer 5: L-BFGS Minimiser
// ============================================================
// Limited-memory BFGS for smooth, unconstrained objectives.
//
// Each iteration:
//   1. Build a search direction d = -H·g from the last `history`
//      (s, y) correction pairs (two-loop recursion)
//   2. Backtrack along d until the Armijo condition holds:
//        f(x + t·d) <= f(x) + c1 · t · gᵀd
//   3. Store s = x_new - x, y = g_new - g if sᵀy > 0
//
// Stops when max |g_i| <= tol or after `max_iter` iterations.
// Everything is deterministic: same objective and start point,
// same result.
//
// Reference: Nocedal & Wright (2006), Numerical Optimization, §7.2

use std::collections::VecDeque;

/// Sufficient-decrease constant for the Armijo line search
const ARMIJO_C1: f64 = 1e-4;

/// Correction pairs with sᵀy below this are discarded
const MIN_CURVATURE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LbfgsParams {
    /// Number of correction pairs kept
    pub history: usize,
    /// Maximum number of accepted steps
    pub max_iter: usize,
    /// Stop once the largest gradient component is at most this
    pub tol: f64,
    /// Maximum halvings of the step per iteration
    pub max_line_search: usize,
}

impl Default for LbfgsParams {
    fn default() -> Self {
        Self {
            history:         10,
            max_iter:        100,
            tol:             1e-4,
            max_line_search: 40,
        }
    }
}

/// Result of a minimisation run.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub x:          Vec<f64>,
    pub value:      f64,
    pub iterations: usize,
    pub converged:  bool,
}

struct CorrectionPair {
    s:   Vec<f64>,
    y:   Vec<f64>,
    rho: f64,
}

/// Minimise `f` starting from `x0`.
///
/// `f(x, grad)` must return the objective at `x` and write the
/// gradient into `grad` (same length as `x`).
pub fn minimize<F>(mut f: F, x0: Vec<f64>, params: &LbfgsParams) -> Minimum
where
    F: FnMut(&[f64], &mut [f64]) -> f64,
{
    let n = x0.len();
    let mut x  = x0;
    let mut g  = vec![0.0; n];
    let mut fx = f(&x, &mut g);

    let mut x_new = vec![0.0; n];
    let mut g_new = vec![0.0; n];
    let mut pairs: VecDeque<CorrectionPair> = VecDeque::with_capacity(params.history);

    let mut iterations = 0usize;
    let mut converged  = max_abs(&g) <= params.tol;

    while !converged && iterations < params.max_iter {
        // ── Search direction ──────────────────────────────────────────────────
        let mut direction = two_loop(&g, &pairs);
        let mut slope     = dot(&direction, &g);
        if !(slope < 0.0) {
            // Not a descent direction: restart from steepest descent
            pairs.clear();
            direction = g.iter().map(|v| -v).collect();
            slope     = -dot(&g, &g);
        }

        // ── Backtracking line search ──────────────────────────────────────────
        let mut step = if pairs.is_empty() {
            (1.0 / norm(&g)).min(1.0)
        } else {
            1.0
        };
        let mut f_new = f64::NAN;
        let mut accepted = false;

        for _ in 0..params.max_line_search {
            for ((xn, &xi), &di) in x_new.iter_mut().zip(&x).zip(&direction) {
                *xn = xi + step * di;
            }
            f_new = f(&x_new, &mut g_new);
            if f_new.is_finite() && f_new <= fx + ARMIJO_C1 * step * slope {
                accepted = true;
                break;
            }
            step *= 0.5;
        }

        if !accepted {
            tracing::warn!(
                "L-BFGS line search failed at iteration {} (loss={:.6})",
                iterations,
                fx
            );
            break;
        }
        iterations += 1;

        // ── Curvature update ──────────────────────────────────────────────────
        let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = g_new.iter().zip(&g).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > MIN_CURVATURE {
            if pairs.len() == params.history {
                pairs.pop_front();
            }
            if params.history > 0 {
                pairs.push_back(CorrectionPair { s, y, rho: 1.0 / sy });
            }
        }

        std::mem::swap(&mut x, &mut x_new);
        std::mem::swap(&mut g, &mut g_new);
        fx = f_new;
        converged = max_abs(&g) <= params.tol;

        tracing::trace!("L-BFGS iteration {}: loss={:.6}", iterations, fx);
    }

    Minimum { x, value: fx, iterations, converged }
}

/// Two-loop recursion: returns -H·g for the implicit inverse Hessian H.
fn two_loop(g: &[f64], pairs: &VecDeque<CorrectionPair>) -> Vec<f64> {
    let mut q = g.to_vec();
    let mut alphas = Vec::with_capacity(pairs.len());

    for p in pairs.iter().rev() {
        let a = p.rho * dot(&p.s, &q);
        axpy(-a, &p.y, &mut q);
        alphas.push(a);
    }

    // Initial Hessian scaling γ = sᵀy / yᵀy from the newest pair
    if let Some(last) = pairs.back() {
        let gamma = 1.0 / (last.rho * dot(&last.y, &last.y));
        q.iter_mut().for_each(|v| *v *= gamma);
    }

    for (p, a) in pairs.iter().zip(alphas.iter().rev()) {
        let b = p.rho * dot(&p.y, &q);
        axpy(a - b, &p.s, &mut q);
    }

    q.iter_mut().for_each(|v| *v = -*v);
    q
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn max_abs(a: &[f64]) -> f64 {
    a.iter().fold(0.0f64, |m, v| m.max(v.abs()))
}

/// y += a·x
fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}
