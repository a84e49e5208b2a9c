// ============================================================
// Layer 5: Classification Pipeline
// ============================================================
// Chains the three stages into one text classifier:
//
//   texts ─► CountVectorizer ─► TfidfTransformer ─► LogisticRegression
//            (n-gram counts)    (idf + L2 norm)     (probability)
//
// fit() learns vocabulary, idf weights and coefficients from the
// training texts only. predict() / predict_probability() run the
// same stages with every learned value frozen.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::traits::TextClassifier;
use crate::ml::logistic::{Hyperparameters, LogisticRegression};
use crate::ml::sparse::SparseRowMatrix;
use crate::ml::tfidf::TfidfTransformer;
use crate::ml::tokenizer::NgramTokenizer;
use crate::ml::vectorizer::CountVectorizer;

// ─── Pipeline Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Vocabulary cap: keep only the most frequent n-grams
    pub max_features: Option<usize>,
    pub min_ngram:    usize,
    pub max_ngram:    usize,
    /// Inverse regularisation strength of the classifier
    pub c:            f64,
    pub max_iter:     usize,
    pub tol:          f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_features: Some(10_000),
            min_ngram:    1,
            max_ngram:    2,
            c:            1.0,
            max_iter:     100,
            tol:          1e-4,
        }
    }
}

// ─── TextPipeline ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPipeline {
    vectorizer: CountVectorizer,
    tfidf:      TfidfTransformer,
    classifier: LogisticRegression,
}

impl TextPipeline {
    /// Build an unfitted pipeline.
    ///
    /// Errors if the n-gram range is invalid (see `NgramTokenizer::new`).
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let tokenizer = NgramTokenizer::new(config.min_ngram, config.max_ngram)?;
        let classifier = Hyperparameters::new()
            .c(config.c)
            .max_iter(config.max_iter)
            .tol(config.tol)
            .build();

        Ok(Self {
            vectorizer: CountVectorizer::new(tokenizer, config.max_features),
            tfidf:      TfidfTransformer::new(),
            classifier,
        })
    }

    pub fn is_fitted(&self) -> bool {
        self.vectorizer.is_fitted() && self.tfidf.is_fitted() && self.classifier.is_fitted()
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    /// Texts → L2-normalised TF-IDF rows using the frozen stages.
    fn features(&self, texts: &[String]) -> Result<SparseRowMatrix> {
        if !self.is_fitted() {
            bail!("Pipeline has not been fitted; call fit() before predicting");
        }
        let counts = self.vectorizer.transform(texts)?;
        self.tfidf.transform(counts)
    }
}

impl TextClassifier for TextPipeline {
    fn fit(&mut self, texts: &[String], labels: &[bool]) -> Result<()> {
        if texts.is_empty() {
            bail!("Cannot fit pipeline: the training set is empty");
        }
        if texts.len() != labels.len() {
            bail!("Got {} training texts but {} labels", texts.len(), labels.len());
        }

        // Fit into fresh stages so a failed fit leaves `self` untouched
        let mut vectorizer = self.vectorizer.clone();
        let mut tfidf      = TfidfTransformer::new();
        let mut classifier = self.classifier.hyperparameters().build();

        let counts   = vectorizer.fit_transform(texts)?;
        let features = tfidf.fit_transform(counts)?;
        tracing::debug!(
            "Training matrix: {} rows x {} columns, {} nonzeros",
            features.rows(),
            features.cols(),
            features.nnz(),
        );
        classifier.fit(&features, labels)?;

        self.vectorizer = vectorizer;
        self.tfidf      = tfidf;
        self.classifier = classifier;
        Ok(())
    }

    fn predict(&self, texts: &[String]) -> Result<Vec<bool>> {
        let features = self.features(texts)?;
        self.classifier.predict(&features)
    }

    fn predict_probability(&self, texts: &[String]) -> Result<Vec<f64>> {
        let features = self.features(texts)?;
        self.classifier.predict_probability(&features)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<bool>) {
        let attacks = [
            "you are an idiot",
            "shut up you idiot",
            "you are a moron and an idiot",
            "go away you stupid moron",
            "what a stupid idiot you are",
        ];
        let benign = [
            "thanks for fixing the citation",
            "i added a reference to the article",
            "please see the talk page for the source",
            "the article needs a better citation",
            "thanks for the helpful edit",
        ];

        let mut texts  = Vec::new();
        let mut labels = Vec::new();
        for (a, b) in attacks.iter().zip(benign.iter()) {
            texts.push(a.to_string());
            labels.push(true);
            texts.push(b.to_string());
            labels.push(false);
        }
        (texts, labels)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fit_and_predict() {
        let (texts, labels) = corpus();
        let mut pipeline = TextPipeline::new(&PipelineConfig::default()).unwrap();
        pipeline.fit(&texts, &labels).unwrap();

        let held_out = strings(&["you stupid idiot", "thanks for the citation"]);
        assert_eq!(pipeline.predict(&held_out).unwrap(), vec![true, false]);

        let probs = pipeline.predict_probability(&held_out).unwrap();
        assert!(probs[0] > 0.5 && probs[1] < 0.5);
    }

    #[test]
    fn test_fitting_twice_is_deterministic() {
        let (texts, labels) = corpus();
        let test = strings(&["idiot article", "helpful moron", "the source page"]);

        let mut a = TextPipeline::new(&PipelineConfig::default()).unwrap();
        let mut b = TextPipeline::new(&PipelineConfig::default()).unwrap();
        a.fit(&texts, &labels).unwrap();
        b.fit(&texts, &labels).unwrap();

        assert_eq!(a.predict(&test).unwrap(), b.predict(&test).unwrap());
        assert_eq!(
            a.predict_probability(&test).unwrap(),
            b.predict_probability(&test).unwrap()
        );
    }

    #[test]
    fn test_predict_does_not_change_state() {
        let (texts, labels) = corpus();
        let mut pipeline = TextPipeline::new(&PipelineConfig::default()).unwrap();
        pipeline.fit(&texts, &labels).unwrap();

        let reference   = strings(&["you idiot", "thanks for the citation"]);
        let vocab_before = pipeline.vectorizer().vocabulary_size();
        let probs_before = pipeline.predict_probability(&reference).unwrap();

        pipeline.predict(&strings(&["brand new words never seen before"])).unwrap();

        assert_eq!(pipeline.vectorizer().vocabulary_size(), vocab_before);
        assert_eq!(pipeline.predict_probability(&reference).unwrap(), probs_before);
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let (texts, labels) = corpus();
        let config = PipelineConfig { max_features: Some(5), ..PipelineConfig::default() };
        let mut pipeline = TextPipeline::new(&config).unwrap();
        pipeline.fit(&texts, &labels).unwrap();
        assert_eq!(pipeline.vectorizer().vocabulary_size(), 5);
    }

    #[test]
    fn test_predict_before_fit_is_an_error() {
        let pipeline = TextPipeline::new(&PipelineConfig::default()).unwrap();
        assert!(pipeline.predict(&strings(&["hello there"])).is_err());
        assert!(pipeline.predict_probability(&strings(&["hello there"])).is_err());
    }

    #[test]
    fn test_insufficient_data_is_an_error() {
        let mut pipeline = TextPipeline::new(&PipelineConfig::default()).unwrap();
        assert!(pipeline.fit(&[], &[]).is_err());
        assert!(pipeline.fit(&strings(&["aa bb"]), &[true, false]).is_err());
        // Single class
        assert!(pipeline.fit(&strings(&["aa bb", "cc dd"]), &[true, true]).is_err());
        assert!(!pipeline.is_fitted());
    }

    #[test]
    fn test_invalid_ngram_range_is_an_error() {
        let zero = PipelineConfig { min_ngram: 0, ..PipelineConfig::default() };
        assert!(TextPipeline::new(&zero).is_err());

        let inverted = PipelineConfig { min_ngram: 3, max_ngram: 2, ..PipelineConfig::default() };
        assert!(TextPipeline::new(&inverted).is_err());
    }
}
