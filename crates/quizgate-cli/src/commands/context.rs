//! The `quizgate context` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgate_core::config::load_config_from;
use quizgate_core::context::assemble_context;
use quizgate_core::request::GenerateRequest;

pub fn execute(
    request_path: PathBuf,
    max_chars: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let body = std::fs::read_to_string(&request_path)
        .with_context(|| format!("failed to read {}", request_path.display()))?;
    let request = GenerateRequest::from_json(&body)
        .with_context(|| format!("invalid request: {}", request_path.display()))?;

    tracing::info!(
        count = request.params.count,
        kind = %request.params.requested,
        "request accepted"
    );

    let max_chars = max_chars.unwrap_or(config.max_context_chars);
    let text = assemble_context(&request.context, max_chars);
    println!("{text}");

    Ok(())
}
