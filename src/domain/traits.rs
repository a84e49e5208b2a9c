// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer is written against these traits, not
// against the concrete TSV loader or the TF-IDF pipeline:
//
//   - TsvLoader    implements CommentSource + AnnotationSource
//   - TextPipeline implements TextClassifier
//   - SavedModel   implements Persistable

use anyhow::Result;
use std::path::Path;

use crate::domain::annotation::Annotation;
use crate::domain::comment::Comment;

// ─── CommentSource ────────────────────────────────────────────────────────────
/// Any component that can load the annotated comments.
pub trait CommentSource {
    fn load_comments(&self) -> Result<Vec<Comment>>;
}

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Any component that can load per-annotator judgments.
pub trait AnnotationSource {
    fn load_annotations(&self) -> Result<Vec<Annotation>>;
}

// ─── TextClassifier ───────────────────────────────────────────────────────────
/// A binary text classifier with a fit / predict lifecycle.
///
/// `fit` is the only method that changes state. Calling either
/// predict method before `fit` returns an error.
pub trait TextClassifier {
    /// Learn all model state from the training texts and labels
    fn fit(&mut self, texts: &[String], labels: &[bool]) -> Result<()>;

    /// Hard class predictions, true = attack
    fn predict(&self, texts: &[String]) -> Result<Vec<bool>>;

    /// Probability of the positive (attack) class for each text
    fn predict_probability(&self, texts: &[String]) -> Result<Vec<f64>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path
    fn load(path: &Path) -> Result<Self>;
}
