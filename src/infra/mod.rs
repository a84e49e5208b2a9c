// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Cross-cutting concerns that sit outside the data and model
// layers:
//
//   metrics.rs    : Evaluator. Accuracy, precision, recall, F1
//                   and ROC AUC on the held-out split, plus a
//                   JSON report writer.
//
//   checkpoint.rs : Model persistence. Saves the fitted pipeline
//                   as JSON and loads it back for `classify`.

/// Held-out evaluation metrics and report
pub mod metrics;

/// Model saving and loading
pub mod checkpoint;
