// ============================================================
// Layer 6: Evaluation Metrics
// ============================================================
// Scores held-out predictions against the true labels.
//
// Metrics (positive class = attack):
//   - accuracy:  fraction of exact label matches
//   - precision: TP / (TP + FP)
//   - recall:    TP / (TP + FN)
//   - f1:        harmonic mean of precision and recall
//   - roc_auc:   area under the ROC curve of the attack probability
//
// ROC AUC is computed by sweeping the threshold over the sorted
// scores. Equal scores are consumed as one group, so the result
// does not depend on input order and ties count as half a win.
//
// Precision / recall / F1 use 0.0 when their denominator is zero.
//
// The report can be written to a JSON file for later comparison:
//   {
//     "roc_auc": 0.9587,
//     "accuracy": 0.9421,
//     ...
//   }

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fs, path::Path};

/// Confusion matrix counts for a binary classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_count: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[bool], y_pred: &[bool]) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let mut m = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (p, t) {
                (true,  true)  => m.tp += 1,
                (true,  false) => m.fp += 1,
                (false, false) => m.tn += 1,
                (false, true)  => m.fn_count += 1,
            }
        }
        Ok(m)
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_count)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn check_lengths(a: usize, b: usize) -> Result<()> {
    if a == 0 {
        bail!("Cannot evaluate on an empty set");
    }
    if a != b {
        bail!("Length mismatch: {a} true labels vs {b} predictions");
    }
    Ok(())
}

/// Area under the ROC curve of `y_score` against `y_true`.
///
/// Errors when the inputs are empty, of different length, contain a
/// NaN score, or when only one class is present.
pub fn roc_auc_score(y_true: &[bool], y_score: &[f64]) -> Result<f64> {
    check_lengths(y_true.len(), y_score.len())?;
    if y_score.iter().any(|s| s.is_nan()) {
        bail!("ROC AUC is undefined for NaN scores");
    }

    let positives = y_true.iter().filter(|&&t| t).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        bail!("ROC AUC is undefined when only one class is present");
    }

    // (score, label) sorted by score, highest first
    let mut pairs: Vec<(f64, bool)> = y_score.iter().copied().zip(y_true.iter().copied()).collect();
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let (mut tp, mut fp) = (0.0f64, 0.0f64);
    let mut area = 0.0;
    let mut i = 0;
    while i < pairs.len() {
        let (tp_prev, fp_prev) = (tp, fp);
        let score = pairs[i].0;

        // Consume every sample tied at this score as one ROC step
        while i < pairs.len() && pairs[i].0 == score {
            if pairs[i].1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }

        // Trapezoid between the previous and current ROC points
        area += (fp - fp_prev) * (tp + tp_prev) / 2.0;
    }

    Ok(area / (positives as f64 * negatives as f64))
}

// ─── EvaluationReport ─────────────────────────────────────────────────────────
/// All held-out metrics for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub roc_auc:    f64,
    pub accuracy:   f64,
    pub f1:         f64,
    pub precision:  f64,
    pub recall:     f64,
    pub confusion:  ConfusionMatrix,
    pub train_size: usize,
    pub test_size:  usize,
}

impl EvaluationReport {
    /// Score predictions and probabilities for the same held-out samples.
    pub fn evaluate(
        y_true:     &[bool],
        y_pred:     &[bool],
        y_score:    &[f64],
        train_size: usize,
    ) -> Result<Self> {
        let confusion = ConfusionMatrix::from_predictions(y_true, y_pred)?;
        let roc_auc   = roc_auc_score(y_true, y_score)?;

        let report = Self {
            roc_auc,
            accuracy:  confusion.accuracy(),
            f1:        confusion.f1(),
            precision: confusion.precision(),
            recall:    confusion.recall(),
            confusion,
            train_size,
            test_size: y_true.len(),
        };

        tracing::info!(
            "Evaluation: auc={:.4} acc={:.4} f1={:.4} precision={:.4} recall={:.4} (tp={} fp={} tn={} fn={})",
            report.roc_auc,
            report.accuracy,
            report.f1,
            report.precision,
            report.recall,
            confusion.tp,
            confusion.fp,
            confusion.tn,
            confusion.fn_count,
        );

        Ok(report)
    }

    /// The three console lines, two decimals each.
    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("Test ROC AUC: {:.2}", self.roc_auc),
            format!("Test ACC: {:.2}", self.accuracy),
            format!("Test F1: {:.2}", self.f1),
        ]
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write report to '{}'", path.display()))?;

        tracing::info!("Saved evaluation report to '{}'", path.display());
        Ok(())
    }
}
