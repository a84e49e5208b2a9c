// ============================================================
// Layer 5: Count Vectorizer
// ============================================================
// Builds a fixed n-gram vocabulary from the training texts and
// turns any text into a sparse vector of raw n-gram counts.
//
// Fitting:
//   1. Count every n-gram over the whole training corpus
//   2. Keep the `max_features` n-grams with the highest total
//      count (ties broken by the n-gram text, ascending)
//   3. Assign column indices in lexicographic order
//
// After fitting the vocabulary is frozen. N-grams that were not
// kept simply contribute nothing when transforming new text.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::ml::sparse::SparseRowMatrix;
use crate::ml::tokenizer::NgramTokenizer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    tokenizer:    NgramTokenizer,
    max_features: Option<usize>,
    /// n-gram → column index; empty until fitted
    vocabulary:   BTreeMap<String, usize>,
}

impl CountVectorizer {
    pub fn new(tokenizer: NgramTokenizer, max_features: Option<usize>) -> Self {
        Self {
            tokenizer,
            max_features,
            vocabulary: BTreeMap::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Learn the vocabulary from `documents`.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            bail!("Cannot fit vectorizer on an empty document set");
        }

        let mut term_counts: HashMap<String, u64> = HashMap::new();
        for doc in documents {
            for term in self.tokenizer.ngrams(doc) {
                *term_counts.entry(term).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            bail!("Empty vocabulary: training documents contain no tokens");
        }
        let distinct = term_counts.len();

        let mut ranked: Vec<(String, u64)> = term_counts.into_iter().collect();
        if let Some(limit) = self.max_features {
            if ranked.len() > limit {
                ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                ranked.truncate(limit);
            }
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort_unstable();

        self.vocabulary = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();

        tracing::info!(
            "Vectorizer fitted: {} of {} distinct n-grams kept",
            self.vocabulary.len(),
            distinct,
        );
        Ok(())
    }

    /// Count vocabulary n-grams in each document.
    pub fn transform(&self, documents: &[String]) -> Result<SparseRowMatrix> {
        if !self.is_fitted() {
            bail!("Vectorizer has not been fitted");
        }

        let mut matrix = SparseRowMatrix::new(self.vocabulary.len());
        for doc in documents {
            let mut counts: HashMap<usize, f64> = HashMap::new();
            for term in self.tokenizer.ngrams(doc) {
                if let Some(&col) = self.vocabulary.get(&term) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
            matrix.push_row(counts.into_iter().collect());
        }

        Ok(matrix)
    }

    pub fn fit_transform(&mut self, documents: &[String]) -> Result<SparseRowMatrix> {
        self.fit(documents)?;
        self.transform(documents)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_is_lexicographic() {
        let mut v = CountVectorizer::new(NgramTokenizer::new(1, 1).unwrap(), None);
        v.fit(&docs(&["zebra apple", "mango"])).unwrap();
        let terms: Vec<_> = v.vocabulary.iter().map(|(t, &i)| (t.as_str(), i)).collect();
        assert_eq!(terms, vec![("apple", 0), ("mango", 1), ("zebra", 2)]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut v = CountVectorizer::new(NgramTokenizer::new(1, 1).unwrap(), Some(2));
        v.fit(&docs(&["aa bb bb cc cc cc", "dd cc"])).unwrap();
        // cc=4, bb=2, aa=1, dd=1
        assert_eq!(v.vocabulary.keys().collect::<Vec<_>>(), vec!["bb", "cc"]);
    }

    #[test]
    fn test_max_features_ties_broken_by_text() {
        let mut v = CountVectorizer::new(NgramTokenizer::new(1, 1).unwrap(), Some(2));
        v.fit(&docs(&["dd cc bb aa"])).unwrap();
        assert_eq!(v.vocabulary.keys().collect::<Vec<_>>(), vec!["aa", "bb"]);
    }

    #[test]
    fn test_counts_include_bigrams() {
        let mut v = CountVectorizer::new(NgramTokenizer::new(1, 2).unwrap(), None);
        let m = v.fit_transform(&docs(&["go away go away"])).unwrap();
        let voc = &v.vocabulary;
        assert_eq!(m.get(0, voc["go"]), 2.0);
        assert_eq!(m.get(0, voc["go away"]), 2.0);
        assert_eq!(m.get(0, voc["away go"]), 1.0);
    }

    #[test]
    fn test_out_of_vocabulary_terms_count_zero() {
        let mut v = CountVectorizer::new(NgramTokenizer::new(1, 1).unwrap(), None);
        v.fit(&docs(&["hello world"])).unwrap();
        let m = v.transform(&docs(&["unseen words only", "hello hello"])).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.row(0).nnz(), 0);
        assert_eq!(m.get(1, v.vocabulary["hello"]), 2.0);
        // Vocabulary is frozen by transform
        assert_eq!(v.vocabulary_size(), 2);
    }

    #[test]
    fn test_transform_before_fit_is_an_error() {
        let v = CountVectorizer::new(NgramTokenizer::default(), None);
        assert!(v.transform(&docs(&["anything"])).is_err());
    }

    #[test]
    fn test_fit_without_tokens_is_an_error() {
        let mut v = CountVectorizer::new(NgramTokenizer::default(), None);
        assert!(v.fit(&docs(&["a ! ?"])).is_err());
        assert!(v.fit(&[]).is_err());
    }
}
