// ============================================================
// Layer 6: Checkpoint Manager
// ============================================================
// Saves and restores a fitted pipeline as JSON so that the
// `classify` command can score new comments without retraining.
//
// What gets saved (one file):
//   checkpoints/
//     model.json   ← pipeline config, fitted pipeline
//                    (vocabulary, idf, coefficients) and the
//                    evaluation report of the run that produced it
//
// A restored pipeline predicts exactly what the saved one did:
// serde_json is built with float_roundtrip, so every f64 survives.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::traits::Persistable;
use crate::infra::metrics::EvaluationReport;
use crate::ml::pipeline::{PipelineConfig, TextPipeline};

/// Name of the model file inside the checkpoint directory
pub const MODEL_FILE: &str = "model.json";

/// Everything needed to reuse a trained classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    pub config:   PipelineConfig,
    pub pipeline: TextPipeline,
    pub report:   Option<EvaluationReport>,
}

impl Persistable for SavedModel {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write model to '{}'", path.display()))?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| {
            format!(
                "Cannot read model from '{}'. Have you run with --model-dir first?",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a valid model file", path.display()))
    }
}

/// Manages the model file inside a checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    /// Write `model` to {dir}/model.json, creating the directory.
    pub fn save_model(&self, model: &SavedModel) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))?;

        let path = self.model_path();
        model.save(&path)?;

        tracing::info!(
            "Saved model ({} features) to '{}'",
            model.pipeline.vectorizer().vocabulary_size(),
            path.display()
        );
        Ok(path)
    }

    /// Read {dir}/model.json back.
    pub fn load_model(&self) -> Result<SavedModel> {
        let path = self.model_path();
        let model = SavedModel::load(&path)?;
        tracing::info!("Loaded model from '{}'", path.display());
        Ok(model)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::TextClassifier;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let config = PipelineConfig::default();
        let mut pipeline = TextPipeline::new(&config).unwrap();
        pipeline
            .fit(
                &strings(&["you idiot", "thanks friend", "stupid idiot", "nice edit friend"]),
                &[true, false, true, false],
            )
            .unwrap();

        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("ckpt"));
        let saved = SavedModel { config: config.clone(), pipeline, report: None };
        let path = ckpt.save_model(&saved).unwrap();
        assert!(path.ends_with(MODEL_FILE));

        let loaded = ckpt.load_model().unwrap();
        assert_eq!(loaded.config, config);

        let probe = strings(&["idiot friend", "unseen"]);
        assert_eq!(
            loaded.pipeline.predict_probability(&probe).unwrap(),
            saved.pipeline.predict_probability(&probe).unwrap()
        );
    }

    #[test]
    fn test_load_missing_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CheckpointManager::new(dir.path()).load_model().is_err());
    }

    #[test]
    fn test_load_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), "not json").unwrap();
        assert!(CheckpointManager::new(dir.path()).load_model().is_err());
    }
}
