// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing the dataset
// and the classifier contract.
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO ML math
//   - Only data types and the traits other layers implement
//
// The two input files map onto two record types:
//
//   attack_annotated_comments.tsv  →  Comment     (one row per revision)
//   attack_annotations.tsv         →  Annotation  (one row per annotator)
//
// After labelling and normalisation a Comment becomes a
// LabelledComment, which is what the pipeline trains on.

/// A talk page comment and its derived, labelled form
pub mod comment;

/// A single annotator's judgment about one comment
pub mod annotation;

/// Core abstractions (traits) that other layers implement
pub mod traits;
