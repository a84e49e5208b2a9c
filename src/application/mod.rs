// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and config structs

/// Download the dataset files
pub mod fetch_use_case;

/// The full fetch → label → train → evaluate workflow
pub mod train_use_case;

/// Score new comments with a saved model
pub mod classify_use_case;
