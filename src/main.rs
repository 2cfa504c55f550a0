use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

mod config;
mod dataset;
mod error;
mod evaluate;
mod logging;
mod models;
mod predictor;
mod remote;
mod report;
mod scorer;

use config::RemoteArgs;
use models::{ScoreResult, ScoredStudent, StudentProfile};
use predictor::{Outcome, Predictor, Source};

#[derive(Parser)]
#[command(name = "placement-predictor")]
#[command(about = "Student placement probability estimates with a local fallback heuristic", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict placement for one student, remote model first
    Predict {
        /// JSON file holding the profile; flags below override its fields
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        cgpa: Option<f64>,
        #[arg(long)]
        technical_skill_score: Option<u32>,
        #[arg(long)]
        soft_skill_score: Option<u32>,
        #[arg(long)]
        backlogs: Option<u32>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Score every row of a dataset CSV with the local heuristic
    Batch {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Compare local predictions against recorded placement outcomes
    Evaluate {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Generate a markdown readiness report for a dataset
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Score the built-in sample profiles
    Sample,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

#[derive(Serialize)]
struct BatchLine<'a> {
    student_id: Option<&'a str>,
    #[serde(flatten)]
    result: &'a ScoreResult,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json);

    match cli.command {
        Commands::Predict {
            input,
            cgpa,
            technical_skill_score,
            soft_skill_score,
            backlogs,
            format,
            remote,
        } => {
            let mut profile = match input {
                Some(path) => read_profile(&path)?,
                None => StudentProfile::default(),
            };
            if let Some(value) = cgpa {
                profile.cgpa = value;
            }
            if let Some(value) = technical_skill_score {
                profile.technical_skill_score = value;
            }
            if let Some(value) = soft_skill_score {
                profile.soft_skill_score = value;
            }
            if let Some(value) = backlogs {
                profile.backlogs = value;
            }

            let predictor = Predictor::from_config(remote.remote_config());
            let outcome = predictor.predict(&profile).await;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Format::Markdown => print!("{}", report::render_card(&outcome)),
            }
        }
        Commands::Batch { csv } => {
            let rows = dataset::load_csv(&csv)?;
            for row in &rows {
                let result = scorer::score(&row.profile);
                let line = BatchLine {
                    student_id: row.student_id.as_deref(),
                    result: &result,
                };
                println!("{}", serde_json::to_string(&line)?);
            }
            info!(students = rows.len(), "scored dataset {}", csv.display());
        }
        Commands::Evaluate { csv } => {
            let scored = score_dataset(&csv)?;
            let evaluation =
                evaluate::evaluate(scored.iter().map(|student| (&student.result, student.placed)));
            if evaluation.labelled == 0 {
                println!("No labelled rows in {}.", csv.display());
                return Ok(());
            }
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        Commands::Report { csv, out } => {
            let scored = score_dataset(&csv)?;
            let evaluation =
                evaluate::evaluate(scored.iter().map(|student| (&student.result, student.placed)));
            let dataset_label = csv
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| csv.display().to_string());
            let report = report::build_report(
                &dataset_label,
                Utc::now().date_naive(),
                &scored,
                Some(&evaluation),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Sample => {
            for (name, profile) in dataset::sample_profiles() {
                let outcome = Outcome {
                    source: Source::Local,
                    result: scorer::score(&profile),
                };
                println!("## {name}");
                print!("{}", report::render_card(&outcome));
                println!();
            }
        }
    }

    Ok(())
}

fn read_profile(path: &Path) -> anyhow::Result<StudentProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON object", path.display()))
}

fn score_dataset(path: &Path) -> anyhow::Result<Vec<ScoredStudent>> {
    let rows = dataset::load_csv(path)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| ScoredStudent {
            label: row
                .student_id
                .unwrap_or_else(|| format!("row {}", index + 1)),
            placed: row.placed,
            result: scorer::score(&row.profile),
        })
        .collect())
}
