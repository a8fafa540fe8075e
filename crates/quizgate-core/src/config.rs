//! Configuration loading.
//!
//! Settings come from a TOML file (explicit path, `./quizgate.toml`, or
//! `~/.config/quizgate/config.toml`, first match wins), then environment
//! overrides, then defaults for anything left unset.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::audit::DistractorBand;
use crate::context::DEFAULT_MAX_CONTEXT_CHARS;
use crate::engine::EngineConfig;
use crate::grounding::DEFAULT_MIN_GROUNDING;

/// Top-level quizgate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizgateConfig {
    /// Minimum grounding score for a question to be accepted.
    #[serde(default = "default_min_grounding")]
    pub min_grounding: f64,
    /// Length band for the uneven-distractor advisory.
    #[serde(default)]
    pub distractor_band: DistractorBand,
    /// Cap on assembled context length, in characters.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    /// Provider label written into response envelopes.
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_min_grounding() -> f64 {
    DEFAULT_MIN_GROUNDING
}
fn default_max_context_chars() -> usize {
    DEFAULT_MAX_CONTEXT_CHARS
}
fn default_provider() -> String {
    "offline".to_string()
}

impl Default for QuizgateConfig {
    fn default() -> Self {
        Self {
            min_grounding: default_min_grounding(),
            distractor_band: DistractorBand::default(),
            max_context_chars: default_max_context_chars(),
            provider: default_provider(),
        }
    }
}

impl QuizgateConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_grounding: self.min_grounding,
            distractor_band: self.distractor_band,
        }
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.min_grounding),
            "min_grounding must be between 0.0 and 1.0, got {}",
            self.min_grounding
        );
        let band = &self.distractor_band;
        anyhow::ensure!(
            band.lower >= 0.0 && band.lower <= 1.0 && band.upper >= 1.0,
            "distractor_band must satisfy 0 <= lower <= 1 <= upper, got {}..{}",
            band.lower,
            band.upper
        );
        anyhow::ensure!(
            self.max_context_chars > 0,
            "max_context_chars must be positive"
        );
        Ok(())
    }
}

/// Load configuration from the default locations.
///
/// Environment variable overrides: `QUIZGATE_MIN_GROUNDING`, `MAX_CONTEXT_CHARS`.
pub fn load_config() -> Result<QuizgateConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgateConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgate.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizgateConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgateConfig::default(),
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Apply environment overrides, looking variables up through `lookup`.
fn apply_env_overrides(
    mut config: QuizgateConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<QuizgateConfig> {
    if let Some(raw) = lookup("QUIZGATE_MIN_GROUNDING") {
        config.min_grounding = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZGATE_MIN_GROUNDING: '{raw}'"))?;
    }
    if let Some(raw) = lookup("MAX_CONTEXT_CHARS") {
        config.max_context_chars = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid MAX_CONTEXT_CHARS: '{raw}'"))?;
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgate"))
}
