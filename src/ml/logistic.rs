// ============================================================
// Layer 5: Logistic Regression
// ============================================================
// Binary L2-regularised logistic regression with an unpenalised
// intercept, fitted on sparse TF-IDF rows.
//
// Model:
//   z = w·x + b
//   P(attack | x) = σ(z) = 1 / (1 + e^(-z))
//
// Objective (minimised with L-BFGS, starting from all zeros):
//   L(w, b) = (1/n) Σ [ ln(1 + e^z_i) - t_i·z_i ]  +  ||w||² / (2·C·n)
//
//   t_i ∈ {0, 1}   true label
//   C              inverse regularisation strength (default 1.0)
//
// Gradient:
//   ∂L/∂w = (1/n) Σ (σ(z_i) - t_i)·x_i  +  w / (C·n)
//   ∂L/∂b = (1/n) Σ (σ(z_i) - t_i)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::ml::lbfgs::{self, LbfgsParams};
use crate::ml::sparse::SparseRowMatrix;

/// Hyperparameters for a LogisticRegression model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    c:        f64,
    max_iter: usize,
    tol:      f64,
    history:  usize,
}

impl Hyperparameters {
    /// Default settings: C = 1.0, 100 iterations, tol = 1e-4, 10 correction pairs.
    pub fn new() -> Hyperparameters {
        Hyperparameters {
            c:        1.0,
            max_iter: 100,
            tol:      1e-4,
            history:  10,
        }
    }

    /// Set the inverse regularisation strength. Smaller values regularise more.
    pub fn c(&mut self, c: f64) -> &mut Hyperparameters {
        self.c = c;
        self
    }

    /// Set the maximum number of L-BFGS iterations.
    pub fn max_iter(&mut self, max_iter: usize) -> &mut Hyperparameters {
        self.max_iter = max_iter;
        self
    }

    /// Set the gradient tolerance at which fitting stops.
    pub fn tol(&mut self, tol: f64) -> &mut Hyperparameters {
        self.tol = tol;
        self
    }

    /// Build an unfitted model.
    pub fn build(&self) -> LogisticRegression {
        LogisticRegression {
            hyperparameters: *self,
            coefficients:    None,
        }
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self::new()
    }
}

/// Learned weights and intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub weights:   Vec<f64>,
    pub intercept: f64,
}

/// A two-class logistic regression classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    hyperparameters: Hyperparameters,
    coefficients:    Option<Coefficients>,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

impl LogisticRegression {
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Fit the model on rows `x` and boolean labels `y`.
    /// Any previous fit is replaced.
    pub fn fit(&mut self, x: &SparseRowMatrix, y: &[bool]) -> Result<()> {
        let hp = self.hyperparameters;

        if x.rows() == 0 {
            bail!("Cannot fit logistic regression on zero samples");
        }
        if x.rows() != y.len() {
            bail!("Got {} samples but {} labels", x.rows(), y.len());
        }
        if y.iter().all(|&v| v) || y.iter().all(|&v| !v) {
            bail!("Logistic regression needs samples of both classes in the training data");
        }
        if !(hp.c > 0.0 && hp.c.is_finite()) {
            bail!("Regularisation strength C must be positive, got {}", hp.c);
        }

        let d       = x.cols();
        let n       = x.rows() as f64;
        let l2      = 1.0 / (hp.c * n);
        let targets: Vec<f64> = y.iter().map(|&v| if v { 1.0 } else { 0.0 }).collect();

        let params = LbfgsParams {
            history:  hp.history,
            max_iter: hp.max_iter,
            tol:      hp.tol,
            ..LbfgsParams::default()
        };

        let objective = |theta: &[f64], grad: &mut [f64]| -> f64 {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let (w, b) = theta.split_at(d);
            let b = b[0];

            let mut loss = 0.0;
            for (row, &t) in x.iter_rows().zip(&targets) {
                let z = row.dot(w) + b;
                loss += softplus(z) - t * z;

                let residual = sigmoid(z) - t;
                for (j, v) in row.iter_nonzero() {
                    grad[j] += residual * v;
                }
                grad[d] += residual;
            }

            loss /= n;
            grad.iter_mut().for_each(|g| *g /= n);

            let mut sq = 0.0;
            for (gj, &wj) in grad[..d].iter_mut().zip(w) {
                *gj += l2 * wj;
                sq  += wj * wj;
            }
            loss + 0.5 * l2 * sq
        };

        let min = lbfgs::minimize(objective, vec![0.0; d + 1], &params);

        if min.converged {
            tracing::info!(
                "Logistic regression converged after {} iterations (loss={:.6})",
                min.iterations,
                min.value
            );
        } else {
            tracing::warn!(
                "Logistic regression did not converge within {} iterations (loss={:.6})",
                min.iterations,
                min.value
            );
        }

        let mut weights = min.x;
        let intercept = weights.pop().unwrap_or(0.0);
        self.coefficients = Some(Coefficients { weights, intercept });
        Ok(())
    }

    /// Raw scores z = w·x + b.
    pub fn decision_function(&self, x: &SparseRowMatrix) -> Result<Vec<f64>> {
        let Some(coef) = &self.coefficients else {
            bail!("Logistic regression has not been fitted");
        };
        if x.cols() != coef.weights.len() {
            bail!(
                "Input has {} features but the model was fitted with {}",
                x.cols(),
                coef.weights.len()
            );
        }

        Ok(x.iter_rows()
            .map(|row| row.dot(&coef.weights) + coef.intercept)
            .collect())
    }

    /// Positive-class probabilities σ(z).
    pub fn predict_probability(&self, x: &SparseRowMatrix) -> Result<Vec<f64>> {
        Ok(self.decision_function(x)?.into_iter().map(sigmoid).collect())
    }

    /// Hard predictions: true when the probability exceeds 0.5.
    pub fn predict(&self, x: &SparseRowMatrix) -> Result<Vec<bool>> {
        Ok(self.decision_function(x)?.into_iter().map(|z| z > 0.0).collect())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Feature 0 marks positives, feature 1 marks negatives.
    fn separable() -> (SparseRowMatrix, Vec<bool>) {
        let mut x = SparseRowMatrix::new(3);
        let mut y = Vec::new();
        for i in 0..20 {
            if i % 2 == 0 {
                x.push_row(vec![(0, 1.0), (2, 0.3)]);
                y.push(true);
            } else {
                x.push_row(vec![(1, 1.0), (2, 0.3)]);
                y.push(false);
            }
        }
        (x, y)
    }

    #[test]
    fn test_sigmoid_and_softplus() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((softplus(0.0) - 2f64.ln()).abs() < 1e-12);
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-9);
        assert!(softplus(-1000.0) >= 0.0);
    }

    #[test]
    fn test_learns_separable_data() {
        let (x, y) = separable();
        let mut model = Hyperparameters::new().build();
        model.fit(&x, &y).unwrap();

        assert_eq!(model.predict(&x).unwrap(), y);

        let coef = model.coefficients.as_ref().unwrap();
        assert!(coef.weights[0] > 0.0);
        assert!(coef.weights[1] < 0.0);
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let (x, y) = separable();
        let mut model = Hyperparameters::new().build();
        model.fit(&x, &y).unwrap();

        let probs = model.predict_probability(&x).unwrap();
        for (p, &label) in probs.iter().zip(&y) {
            assert!((0.0..=1.0).contains(p));
            assert_eq!(*p > 0.5, label);
        }
    }

    #[test]
    fn test_stronger_regularisation_shrinks_weights() {
        let (x, y) = separable();
        let mut loose = Hyperparameters::new().c(10.0).build();
        let mut tight = Hyperparameters::new().c(0.01).build();
        loose.fit(&x, &y).unwrap();
        tight.fit(&x, &y).unwrap();

        let lw = loose.coefficients.as_ref().unwrap().weights[0];
        let tw = tight.coefficients.as_ref().unwrap().weights[0];
        assert!(lw > tw);
        assert!(tw > 0.0);
    }

    #[test]
    fn test_refit_is_deterministic() {
        let (x, y) = separable();
        let mut a = Hyperparameters::new().build();
        let mut b = Hyperparameters::new().build();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.coefficients, b.coefficients);
    }

    #[test]
    fn test_predict_before_fit_is_an_error() {
        let (x, _) = separable();
        let model = Hyperparameters::new().build();
        assert!(model.predict(&x).is_err());
        assert!(model.predict_probability(&x).is_err());
    }

    #[test]
    fn test_fit_input_validation() {
        let (x, y) = separable();
        let mut model = Hyperparameters::new().build();

        assert!(model.fit(&SparseRowMatrix::new(3), &[]).is_err());
        assert!(model.fit(&x, &y[..5]).is_err());
        assert!(model.fit(&x, &vec![true; 20]).is_err());
        assert!(Hyperparameters::new().c(0.0).build().fit(&x, &y).is_err());
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_feature_count_mismatch_is_an_error() {
        let (x, y) = separable();
        let mut model = Hyperparameters::new().build();
        model.fit(&x, &y).unwrap();
        assert!(model.predict(&SparseRowMatrix::new(4)).is_err());
    }
}
