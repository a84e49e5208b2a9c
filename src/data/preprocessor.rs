// ============================================================
// Layer 4: Text Preprocessor
// ============================================================
// The Wikipedia dump encodes newlines and tabs inside comment
// text as the literal placeholders NEWLINE_TOKEN and TAB_TOKEN
// so that the TSV stays one-record-per-line.
//
// Cleaning steps (applied in order):
//   1. NEWLINE_TOKEN → " "
//   2. TAB_TOKEN     → " "
//
// Each placeholder becomes exactly one space. Nothing else is
// touched: case, punctuation and repeated whitespace are left
// for the vectorizer's tokenizer to deal with.

/// Placeholder the dataset uses for a newline inside a comment
pub const NEWLINE_TOKEN: &str = "NEWLINE_TOKEN";

/// Placeholder the dataset uses for a tab inside a comment
pub const TAB_TOKEN: &str = "TAB_TOKEN";

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Replace every placeholder token with a single space.
    pub fn clean(&self, text: &str) -> String {
        text.replace(NEWLINE_TOKEN, " ").replace(TAB_TOKEN, " ")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
