// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   run       fetch, train and evaluate (the default)
//   fetch     download the dataset only
//   classify  score a comment with a saved model
//
// Every flag has a default matching the application-layer
// Default impls, so a bare `run` reproduces the standard setup.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::fetch_use_case::SourceConfig;
use crate::application::train_use_case::TrainConfig;
use crate::data::fetcher::{ANNOTATIONS_URL, COMMENTS_URL};
use crate::ml::pipeline::PipelineConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the dataset, train the classifier and print test metrics
    Run(RunArgs),

    /// Download the dataset files without training
    Fetch(SourceArgs),

    /// Classify a comment with a model saved by `run --model-dir`
    Classify(ClassifyArgs),
}

/// Where the dataset comes from and where it is kept.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory the TSV files are downloaded to and read from
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = COMMENTS_URL)]
    pub comments_url: String,

    #[arg(long, default_value = ANNOTATIONS_URL)]
    pub annotations_url: String,
}

impl From<SourceArgs> for SourceConfig {
    fn from(a: SourceArgs) -> Self {
        SourceConfig {
            data_dir:        a.data_dir,
            comments_url:    a.comments_url,
            annotations_url: a.annotations_url,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Skip the download and use files already in --data-dir
    #[arg(long)]
    pub offline: bool,

    /// Keep only the N most frequent n-grams (0 keeps all)
    #[arg(long, default_value_t = 10_000)]
    pub max_features: usize,

    #[arg(long, default_value_t = 1)]
    pub min_ngram: usize,

    #[arg(long, default_value_t = 2)]
    pub max_ngram: usize,

    /// Inverse L2 regularisation strength
    #[arg(long, default_value_t = 1.0)]
    pub c: f64,

    /// L-BFGS iteration cap
    #[arg(long, default_value_t = 100)]
    pub max_iter: usize,

    /// Stop once the largest gradient component falls below this
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,

    /// Save the fitted model to {dir}/model.json
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Write all metrics as JSON to this file
    #[arg(long)]
    pub report_out: Option<PathBuf>,
}

impl From<RunArgs> for TrainConfig {
    fn from(a: RunArgs) -> Self {
        TrainConfig {
            source:  a.source.into(),
            offline: a.offline,
            pipeline: PipelineConfig {
                max_features: (a.max_features > 0).then_some(a.max_features),
                min_ngram:    a.min_ngram,
                max_ngram:    a.max_ngram,
                c:            a.c,
                max_iter:     a.max_iter,
                tol:          a.tol,
            },
            model_dir:  a.model_dir,
            report_out: a.report_out,
        }
    }
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The comment to score
    #[arg(long)]
    pub text: String,

    /// Directory holding model.json
    #[arg(long, default_value = "checkpoints")]
    pub model_dir: PathBuf,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Run(args)) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_run_defaults_match_config_defaults() {
        let config: TrainConfig = run_args(&["pac", "run"]).into();
        let expected = TrainConfig::default();
        assert_eq!(config.source, expected.source);
        assert_eq!(config.pipeline, expected.pipeline);
        assert!(!config.offline);
        assert!(config.model_dir.is_none());
    }

    #[test]
    fn test_run_flags() {
        let config: TrainConfig = run_args(&[
            "pac", "run", "--offline", "--data-dir", "/tmp/wiki", "--max-features", "0",
            "--max-ngram", "3", "--c", "0.5", "--model-dir", "ckpt",
        ])
        .into();
        assert!(config.offline);
        assert_eq!(config.source.data_dir, PathBuf::from("/tmp/wiki"));
        assert_eq!(config.pipeline.max_features, None);
        assert_eq!(config.pipeline.max_ngram, 3);
        assert_eq!(config.pipeline.c, 0.5);
        assert_eq!(config.model_dir, Some(PathBuf::from("ckpt")));
    }

    #[test]
    fn test_no_subcommand_parses() {
        assert!(Cli::try_parse_from(["pac"]).unwrap().command.is_none());
    }

    #[test]
    fn test_classify_requires_text() {
        assert!(Cli::try_parse_from(["pac", "classify"]).is_err());
        let cli = Cli::try_parse_from(["pac", "classify", "--text", "hi"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Classify(ref a)) if a.text == "hi"));
    }

    #[test]
    fn test_bad_ngram_flags_return_an_error() {
        use crate::application::train_use_case::TrainUseCase;

        let dir  = tempfile::tempdir().unwrap();
        let data = dir.path().to_str().unwrap();

        for range in [["--min-ngram", "0", "--max-ngram", "2"], ["--min-ngram", "3", "--max-ngram", "2"]] {
            let mut argv = vec!["pac", "run", "--offline", "--data-dir", data];
            argv.extend(range);
            let err = TrainUseCase::new(run_args(&argv).into()).execute().unwrap_err();
            assert!(err.to_string().contains("n-gram range"));
        }
    }
}
