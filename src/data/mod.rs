// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between the two remote TSV files and the
// train / test subsets the classifier consumes.
//
// The pipeline flows in this order:
//
//   figshare URLs
//       │
//       ▼
//   DataFetcher       → downloads both files into the data dir
//       │
//       ▼
//   TsvLoader         → parses rows into Comment / Annotation
//       │
//       ▼
//   aggregate_labels  → majority vote per rev_id
//       │
//       ▼
//   Preprocessor      → strips NEWLINE_TOKEN / TAB_TOKEN
//       │
//       ▼
//   join_labels       → inner join of comments and labels
//       │
//       ▼
//   split_train_test  → train / test subsets by the split column

/// Downloads the dataset files over HTTP
pub mod fetcher;

/// Parses the tab-separated dataset files
pub mod loader;

/// Reduces per-annotator judgments to one label per comment
pub mod labels;

/// Normalises raw comment text
pub mod preprocessor;

/// Joins comments with their labels
pub mod dataset;

/// Partitions labelled comments by their pre-assigned split
pub mod splitter;
