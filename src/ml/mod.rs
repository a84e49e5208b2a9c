// ============================================================
// Layer 5: ML / Model Layer
// ============================================================
// All numeric code lives here. No other layer does any math on
// feature vectors.
//
//   tokenizer.rs    lowercase word n-grams
//   vectorizer.rs   frozen n-gram vocabulary → count vectors
//   tfidf.rs        smoothed idf weighting + L2 normalisation
//   sparse.rs       row-wise sparse matrix shared by the stages
//   lbfgs.rs        limited-memory quasi-Newton minimiser
//   logistic.rs     L2-regularised logistic regression
//   pipeline.rs     the three stages chained behind TextClassifier

/// Word n-gram extraction
pub mod tokenizer;

/// Sparse row-major matrix
pub mod sparse;

/// Count vectorizer with a capped vocabulary
pub mod vectorizer;

/// TF-IDF weighting
pub mod tfidf;

/// L-BFGS optimiser
pub mod lbfgs;

/// Binary logistic regression
pub mod logistic;

/// Vectorizer + TF-IDF + classifier pipeline
pub mod pipeline;
