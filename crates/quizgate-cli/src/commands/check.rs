//! The `quizgate check` command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;

use quizgate_core::config::load_config_from;
use quizgate_core::context::{assemble_context, truncate_chars};
use quizgate_core::extract::parse_candidates;
use quizgate_core::report::GenerateResponse;
use quizgate_core::request::GenerateRequest;
use quizgate_core::{BatchOutcome, QuizGate};

pub fn execute(
    candidates_path: PathBuf,
    context_path: Option<PathBuf>,
    request_path: Option<PathBuf>,
    min_grounding: Option<f64>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if !matches!(format.as_str(), "text" | "json") {
        anyhow::bail!("unknown format '{format}', expected text or json");
    }

    let start = Instant::now();

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(min) = min_grounding {
        config.min_grounding = min;
    }
    config.validate()?;

    let context_text = match (context_path, request_path) {
        (Some(path), _) => truncate_chars(&read(&path)?, config.max_context_chars),
        (None, Some(path)) => {
            let request = GenerateRequest::from_json(&read(&path)?)
                .with_context(|| format!("invalid request: {}", path.display()))?;
            assemble_context(&request.context, config.max_context_chars)
        }
        (None, None) => anyhow::bail!("either --context or --request is required"),
    };

    let candidates = parse_candidates(&read(&candidates_path)?);
    let total = candidates.len();
    tracing::info!(
        "checking {total} candidate(s) against {} chars of context",
        context_text.chars().count()
    );

    let gate = QuizGate::new(config.engine_config());
    let outcome = gate.evaluate(&Value::Array(candidates), &context_text);

    if format == "text" {
        print_outcome(&outcome, total);
    }

    let response = GenerateResponse::from_outcome(&config.provider, start.elapsed(), outcome);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    if let Some(path) = output {
        response.save_json(&path)?;
        if format == "text" {
            println!("\nResponse saved to {}", path.display());
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_outcome(outcome: &BatchOutcome, total: usize) {
    use comfy_table::{Cell, Table};

    println!("Accepted {} of {total} candidates", outcome.questions.len());

    if !outcome.type_counts.is_empty() {
        let accepted = outcome.questions.len() as f64;
        let mut table = Table::new();
        table.set_header(vec!["Type", "Count", "Share"]);
        for (kind, count) in &outcome.type_counts {
            table.add_row(vec![
                Cell::new(kind),
                Cell::new(count),
                Cell::new(format!("{:.0}%", *count as f64 / accepted * 100.0)),
            ]);
        }
        println!("\n{table}");

        println!("\nQuestions:");
        for q in &outcome.questions {
            println!(
                "  {} ({}) quality {:.2}",
                q.id,
                q.kind(),
                q.quality.unwrap_or_default()
            );
        }
    }

    if !outcome.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &outcome.warnings {
            println!("  {w}");
        }
    }
}
