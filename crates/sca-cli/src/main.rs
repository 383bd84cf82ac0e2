//! SCA CLI - Command-line interface
//!
//! Usage:
//!   sca analyze <file> [--output <path>] [--pretty]
//!   sca charts <file>

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sca_core::{AppConfig, ScaError};
use sca_extractor::{create_tagger, AttributeExtractor, PieChart};

#[derive(Parser)]
#[command(name = "sca")]
#[command(about = "Sales Conversation Analyzer CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transcript and emit the report JSON
    Analyze {
        /// Path to the transcript (.txt)
        file: PathBuf,
        /// Write the report here instead of stdout,
        /// conventionally extracted_information.json
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the pie-chart slice breakdown for a transcript
    Charts {
        /// Path to the transcript (.txt)
        file: PathBuf,
    },
}

/// Read a transcript file, requiring valid UTF-8. No fallback encoding.
fn read_transcript(path: &PathBuf) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    String::from_utf8(bytes)
        .map_err(|e| ScaError::InputDecode(format!("{} is not valid UTF-8: {e}", path.display())))
        .map_err(Into::into)
}

fn build_extractor() -> anyhow::Result<AttributeExtractor> {
    let config = AppConfig::from_env()?;
    let tagger = create_tagger(&config.tagger)?;
    let extractor = AttributeExtractor::new(tagger)?;

    tracing::debug!(tagger = extractor.tagger_name(), "tagger initialized");
    Ok(extractor)
}

fn print_chart(chart: &PieChart) {
    println!("{}:", chart.title);
    if chart.is_empty() {
        println!("  (no slices)");
        return;
    }
    for slice in &chart.slices {
        println!("  {} = {}", slice.label, slice.value);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            output,
            pretty,
        } => {
            let text = read_transcript(&file)?;
            let extractor = build_extractor()?;
            let report = extractor.extract(&text).await?;

            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Charts { file } => {
            let text = read_transcript(&file)?;
            let extractor = build_extractor()?;
            let report = extractor.extract(&text).await?;

            print_chart(&PieChart::requirements(&report.customer_requirements));
            print_chart(&PieChart::policies(&report.company_policies));
            print_chart(&PieChart::objections(&report.customer_objections));
        }
    }

    Ok(())
}
