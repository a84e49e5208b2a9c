// ============================================================
// Layer 2: ClassifyUseCase
// ============================================================
// Loads a model saved by a training run and scores new
// comments. Input text goes through the same normaliser the
// training data went through.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::TextClassifier;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::pipeline::TextPipeline;

/// Verdict for one comment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub attack:      bool,
    /// Probability of the attack class
    pub probability: f64,
}

pub struct ClassifyUseCase {
    pipeline:     TextPipeline,
    preprocessor: Preprocessor,
}

impl ClassifyUseCase {
    /// Load {model_dir}/model.json.
    pub fn new(model_dir: impl Into<PathBuf>) -> Result<Self> {
        let saved = CheckpointManager::new(model_dir).load_model()?;
        Ok(Self { pipeline: saved.pipeline, preprocessor: Preprocessor::new() })
    }

    pub fn classify(&self, text: &str) -> Result<Classification> {
        let texts = vec![self.preprocessor.clean(text)];
        let probability = self.pipeline.predict_probability(&texts)?[0];
        let attack      = self.pipeline.predict(&texts)?[0];
        Ok(Classification { attack, probability })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::checkpoint::SavedModel;
    use crate::ml::pipeline::PipelineConfig;

    fn save_model(dir: &std::path::Path) {
        let config = PipelineConfig::default();
        let mut pipeline = TextPipeline::new(&config).unwrap();
        let texts: Vec<String> = ["you stupid idiot", "thanks for the edit", "idiot loser", "nice article edit"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        pipeline.fit(&texts, &[true, false, true, false]).unwrap();
        CheckpointManager::new(dir)
            .save_model(&SavedModel { config, pipeline, report: None })
            .unwrap();
    }

    #[test]
    fn test_classify_with_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        save_model(dir.path());

        let uc = ClassifyUseCase::new(dir.path()).unwrap();
        let attack = uc.classify("what an idiotNEWLINE_TOKENloser").unwrap();
        let benign = uc.classify("thanks for the article").unwrap();

        assert!(attack.attack);
        assert!(attack.probability > 0.5);
        assert!(!benign.attack);
        assert!(benign.probability < attack.probability);
    }

    #[test]
    fn test_missing_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ClassifyUseCase::new(dir.path()).is_err());
    }
}
