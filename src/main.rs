use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use learning_risk_analytics::model::ModelBundle;
use learning_risk_analytics::{ingest, report, Analyzer, StampedReport};

#[derive(Parser)]
#[command(name = "learning-risk")]
#[command(about = "Flags students at risk of not completing and rates course difficulty", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a student CSV and write the analysis report
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "data/final_report.json")]
        output: PathBuf,
        #[arg(long, env = "LEARNING_RISK_MODEL", default_value = "models/completion_model.json")]
        model: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Add the generation time to the report
        #[arg(long)]
        stamp: bool,
    },
    /// Write a sample input CSV showing the expected columns
    SampleCsv {
        #[arg(long, default_value = "data/sample_students.csv")]
        out: PathBuf,
    },
    /// Describe the loaded completion model
    ModelInfo {
        #[arg(long, env = "LEARNING_RISK_MODEL", default_value = "models/completion_model.json")]
        model: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            model,
            format,
            stamp,
        } => {
            println!("[1/4] Loading data from {}...", input.display());
            let batch = ingest::read_batch(&input)?;

            let analyzer = Analyzer::load(&model)
                .with_context(|| format!("model unavailable at {}", model.display()))?;

            println!("[2/4] Running inference with {}...", analyzer.model_name());
            let analysis = analyzer.analyze(&batch)?;

            println!("[3/4] Generating analytics...");
            println!(
                "{} students, {} at risk, course difficulty {}",
                analysis.summary.total_students,
                analysis.summary.at_risk_count,
                analysis.course_insights.overall_difficulty
            );

            println!("[4/4] Saving report to {}...", output.display());
            match format {
                OutputFormat::Json if stamp => {
                    ingest::write_json(&output, &StampedReport::now(analysis))?
                }
                OutputFormat::Json => ingest::write_json(&output, &analysis)?,
                OutputFormat::Markdown => {
                    let source = input.display().to_string();
                    let generated_at = stamp.then(chrono::Utc::now);
                    let markdown =
                        report::render_markdown(&analysis, Some(&source), generated_at);
                    ingest::write_text(&output, &markdown)?;
                }
            }
            println!("Analysis complete.");
        }
        Commands::SampleCsv { out } => {
            let written = ingest::write_sample_csv(&out)?;
            println!("Wrote {written} sample rows to {}.", out.display());
        }
        Commands::ModelInfo { model } => {
            let bundle = ModelBundle::load(&model)
                .with_context(|| format!("model unavailable at {}", model.display()))?;
            println!("{}", serde_json::to_string_pretty(&bundle.info())?);
        }
    }

    Ok(())
}
