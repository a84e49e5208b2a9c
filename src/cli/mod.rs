// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands plain config structs to
// Layer 2. Results are printed to stdout; logs go to stderr.
//
// With no subcommand the binary behaves like `run` with every
// default.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, SourceArgs};

use crate::application::{
    classify_use_case::ClassifyUseCase,
    fetch_use_case::FetchUseCase,
    train_use_case::{TrainConfig, TrainUseCase},
};

#[derive(Parser, Debug)]
#[command(
    name = "personal-attack-classifier",
    version,
    about = "Train and evaluate a TF-IDF + logistic regression personal attack classifier on Wikipedia talk page comments."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            None                          => run_train(TrainConfig::default()),
            Some(Commands::Run(args))      => run_train(args.into()),
            Some(Commands::Fetch(args))    => run_fetch(args),
            Some(Commands::Classify(args)) => run_classify(args),
        }
    }
}

fn run_train(config: TrainConfig) -> Result<()> {
    let report = TrainUseCase::new(config).execute()?;
    for line in report.summary_lines() {
        println!("{line}");
    }
    Ok(())
}

fn run_fetch(args: SourceArgs) -> Result<()> {
    FetchUseCase::new(args.into()).execute()?;
    println!("Dataset downloaded.");
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let verdict = ClassifyUseCase::new(args.model_dir)?.classify(&args.text)?;
    let label = if verdict.attack { "attack" } else { "not an attack" };
    println!("{label} (p = {:.2})", verdict.probability);
    Ok(())
}
