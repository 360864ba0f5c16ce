//! Attrition training CLI
//!
//! Loads the raw HR table, fits the pipeline and writes the artifact.

use clap::Parser;
use colored::*;
use std::path::PathBuf;

use crate::pipeline::{run_training, PipelineConfig, TrainingSummary};

fn ok(s: &str) -> ColoredString { s.truecolor(100, 210, 120) }
fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }

#[derive(Parser, Debug)]
#[command(name = "attrition-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train the employee attrition AdaBoost pipeline")]
#[command(long_about = None)]
pub struct Cli {
    /// Raw employee table [default: WA_Fn-UseC_-HR-Employee-Attrition.csv]
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Output artifact [default: adaboost_pipeline.bin]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON pipeline configuration; --data and --output take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(data) = &self.data {
            config.input_path = data.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        Ok(config)
    }
}

/// The one line printed after a successful run
pub fn success_line(summary: &TrainingSummary) -> String {
    format!(
        "{} Pipeline saved to {} {}",
        ok("✓"),
        summary.output_path.display().to_string().white().bold(),
        dim(&format!(
            "({} rows, {} features, {} estimators)",
            summary.n_rows, summary.n_features, summary.n_estimators
        ))
    )
}

pub fn cmd_train(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.pipeline_config()?;
    let summary = run_training(&config)?;
    println!("{}", success_line(&summary));
    Ok(())
}
