// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates one full run in order:
//
//   Step 1: Download the dataset       (Layer 4 - data, skipped offline)
//   Step 2: Load comments/annotations  (Layer 4 - data)
//   Step 3: Majority-vote labels       (Layer 4 - data)
//   Step 4: Normalise + join by rev_id (Layer 4 - data)
//   Step 5: Split train/test           (Layer 4 - data)
//   Step 6: Fit the text pipeline      (Layer 5 - ml)
//   Step 7: Evaluate on the test split (Layer 6 - infra)
//   Step 8: Save report / model        (Layer 6 - infra, optional)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::fetch_use_case::{FetchUseCase, SourceConfig};
use crate::data::{
    dataset::join_labels,
    labels::aggregate_labels,
    loader::TsvLoader,
    preprocessor::Preprocessor,
    splitter::split_train_test,
};
use crate::domain::annotation::Annotation;
use crate::domain::comment::Comment;
use crate::domain::traits::{AnnotationSource, CommentSource, TextClassifier};
use crate::infra::{
    checkpoint::{CheckpointManager, SavedModel},
    metrics::EvaluationReport,
};
use crate::ml::pipeline::{PipelineConfig, TextPipeline};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs. Serialisable so a run can be described
// in JSON alongside its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub source:     SourceConfig,
    /// Use files already in the data directory instead of downloading
    pub offline:    bool,
    pub pipeline:   PipelineConfig,
    pub model_dir:  Option<PathBuf>,
    pub report_out: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            source:     SourceConfig::default(),
            offline:    false,
            pipeline:   PipelineConfig::default(),
            model_dir:  None,
            report_out: None,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run every step and return the held-out evaluation.
    pub fn execute(&self) -> Result<EvaluationReport> {
        let cfg = &self.config;

        // Invalid hyperparameters fail here, before any download
        let pipeline = TextPipeline::new(&cfg.pipeline)?;

        // ── Step 1: Download ─────────────────────────────────────────────────
        if cfg.offline {
            tracing::info!("Offline: using files in '{}'", cfg.source.data_dir.display());
        } else {
            FetchUseCase::new(cfg.source.clone()).execute()?;
        }

        // ── Step 2: Load both tables ─────────────────────────────────────────
        let loader = TsvLoader::new(cfg.source.comments_path(), cfg.source.annotations_path());
        let comments    = loader.load_comments()?;
        let annotations = loader.load_annotations()?;

        // ── Steps 3-7 ────────────────────────────────────────────────────────
        let (pipeline, report) = train_and_evaluate(comments, &annotations, pipeline)?;

        // ── Step 8: Persist ──────────────────────────────────────────────────
        if let Some(path) = &cfg.report_out {
            report.save(path)?;
        }
        if let Some(dir) = &cfg.model_dir {
            let saved = SavedModel {
                config: cfg.pipeline.clone(),
                pipeline,
                report: Some(report.clone()),
            };
            CheckpointManager::new(dir).save_model(&saved)?;
        }

        Ok(report)
    }
}

/// Label, split, fit `pipeline` and score it on in-memory data.
///
/// Fails when either the train or the test subset ends up empty.
pub fn train_and_evaluate(
    comments:    Vec<Comment>,
    annotations: &[Annotation],
    mut pipeline: TextPipeline,
) -> Result<(TextPipeline, EvaluationReport)> {
    let labels  = aggregate_labels(annotations);
    let dataset = join_labels(comments, &labels, &Preprocessor::new());
    if dataset.is_empty() {
        bail!(
            "No comment matched an annotation ({} unlabelled comments, {} orphan labels)",
            dataset.unlabelled,
            dataset.orphan_labels
        );
    }
    tracing::info!(
        "{} labelled comments, {} attacks",
        dataset.len(),
        dataset.attack_count()
    );

    let split = split_train_test(dataset.comments);
    if split.train.is_empty() {
        bail!("No labelled comments in the train split; cannot fit");
    }
    if split.test.is_empty() {
        bail!("No labelled comments in the test split; cannot evaluate");
    }
    tracing::info!(
        "Split: {} train, {} test, {} excluded",
        split.train.len(),
        split.test.len(),
        split.excluded
    );

    pipeline.fit(&split.train_texts(), &split.train_labels())?;

    let test_texts    = split.test_texts();
    let predictions   = pipeline.predict(&test_texts)?;
    let probabilities = pipeline.predict_probability(&test_texts)?;

    let report = EvaluationReport::evaluate(
        &split.test_labels(),
        &predictions,
        &probabilities,
        split.train.len(),
    )?;

    Ok((pipeline, report))
}
