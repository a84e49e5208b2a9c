// ============================================================
// Layer 5: N-gram Tokenizer
// ============================================================
// Turns a comment into the list of word n-grams the vectorizer
// counts.
//
//   1. Lowercase the whole text
//   2. Extract tokens matching \b\w\w+\b
//      (runs of two or more Unicode word characters)
//   3. Emit every contiguous n-gram for n in min_n..=max_n,
//      joined by a single space, shortest n first
//
// Example with ngram_range (1, 2):
//   "You are an IDIOT!" → ["you", "are", "an", "idiot",
//                          "you are", "are an", "an idiot"]

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Two or more word characters between word boundaries.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Word n-gram extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramTokenizer {
    min_n: usize,
    max_n: usize,
}

impl NgramTokenizer {
    /// Create a tokenizer emitting n-grams with min_n <= n <= max_n.
    ///
    /// Errors if min_n is 0 or greater than max_n.
    pub fn new(min_n: usize, max_n: usize) -> Result<Self> {
        if min_n == 0 || min_n > max_n {
            bail!("Invalid n-gram range ({min_n}, {max_n}): need 1 <= min <= max");
        }
        Ok(Self { min_n, max_n })
    }

    /// Lowercased word tokens of `text`, in order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// All n-grams of `text`, unigrams first.
    pub fn ngrams(&self, text: &str) -> Vec<String> {
        let tokens = self.tokens(text);
        let mut out = Vec::new();

        for n in self.min_n..=self.max_n.min(tokens.len()) {
            if n == 1 {
                out.extend(tokens.iter().cloned());
            } else {
                out.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }

        out
    }
}

impl Default for NgramTokenizer {
    fn default() -> Self {
        Self { min_n: 1, max_n: 2 }
    }
}
