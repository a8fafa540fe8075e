//! Batch engine: drives normalization, validation, auditing, and grounding
//! over a batch of raw candidates.
//!
//! Each candidate is handled independently and in input order. Whatever goes
//! wrong with one candidate becomes a warning; the batch itself never fails.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::audit::{audit, DistractorBand};
use crate::grounding::{question_text, round2, ContextIndex, DEFAULT_MIN_GROUNDING};
use crate::ids::{IdGenerator, TimestampIdGenerator};
use crate::model::{Question, QuestionType};
use crate::normalize::Normalizer;
use crate::validate::validate_candidate;

/// Prefix of the closing type-distribution warning.
pub const SUMMARY_PREFIX: &str = "Generated mixed types: ";

/// Tunable thresholds for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum grounding score for acceptance.
    pub min_grounding: f64,
    /// Length band for the uneven-distractor advisory.
    pub distractor_band: DistractorBand,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_grounding: DEFAULT_MIN_GROUNDING,
            distractor_band: DistractorBand::default(),
        }
    }
}

impl EngineConfig {
    /// Replace the grounding threshold when an override is given.
    pub fn with_min_grounding(mut self, min_grounding: Option<f64>) -> Self {
        if let Some(min) = min_grounding {
            self.min_grounding = min;
        }
        self
    }
}

/// Everything a batch produced.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Accepted questions, in input order, each carrying `quality`.
    pub questions: Vec<Question>,
    /// Rejections and advisories in the order they arose, followed by the
    /// type-distribution summary when anything was accepted.
    pub warnings: Vec<String>,
    /// Accepted questions per type, in order of first acceptance.
    pub type_counts: IndexMap<QuestionType, usize>,
}

impl BatchOutcome {
    /// The closing summary line, if one was emitted.
    pub fn summary(&self) -> Option<&str> {
        self.warnings
            .last()
            .map(String::as_str)
            .filter(|w| w.starts_with(SUMMARY_PREFIX))
    }
}

/// The validation-and-scoring engine.
#[derive(Debug, Clone, Default)]
pub struct QuizGate {
    config: EngineConfig,
}

impl QuizGate {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a raw payload against `context_text`, generating missing ids
    /// from the clock.
    ///
    /// A payload that is not a JSON array is treated as an empty batch.
    pub fn evaluate(&self, raw: &Value, context_text: &str) -> BatchOutcome {
        self.evaluate_with_ids(raw, context_text, &mut TimestampIdGenerator)
    }

    /// Like [`evaluate`](Self::evaluate) with a caller-supplied id source.
    pub fn evaluate_with_ids(
        &self,
        raw: &Value,
        context_text: &str,
        ids: &mut dyn IdGenerator,
    ) -> BatchOutcome {
        let candidates: &[Value] = match raw {
            Value::Array(items) => items.as_slice(),
            other => {
                tracing::warn!(
                    "candidate payload is {}, not an array; treating as empty",
                    json_kind(other)
                );
                &[]
            }
        };
        self.evaluate_candidates(candidates, context_text, ids)
    }

    /// Evaluate an already-extracted candidate sequence.
    pub fn evaluate_candidates(
        &self,
        candidates: &[Value],
        context_text: &str,
        ids: &mut dyn IdGenerator,
    ) -> BatchOutcome {
        let index = ContextIndex::new(context_text);
        let mut normalizer = Normalizer::new(ids);
        let mut outcome = BatchOutcome::default();

        for (position, candidate) in candidates.iter().enumerate() {
            let normalized = normalizer.normalize(candidate.clone());
            if let Some(question) = self.screen(normalized, &index, &mut outcome.warnings) {
                tracing::debug!(
                    position,
                    id = %question.id,
                    kind = %question.kind(),
                    quality = question.quality.unwrap_or_default(),
                    "accepted"
                );
                *outcome.type_counts.entry(question.kind()).or_default() += 1;
                outcome.questions.push(question);
            } else {
                tracing::debug!(position, "rejected");
            }
        }

        if !outcome.questions.is_empty() {
            let summary = type_distribution(&outcome.type_counts, outcome.questions.len());
            outcome.warnings.push(summary);
        }

        tracing::info!(
            candidates = candidates.len(),
            accepted = outcome.questions.len(),
            warnings = outcome.warnings.len(),
            "batch evaluated"
        );
        outcome
    }

    /// Run one normalized candidate through validation, audit, and grounding.
    fn screen(
        &self,
        candidate: Value,
        index: &ContextIndex,
        warnings: &mut Vec<String>,
    ) -> Option<Question> {
        let mut question = match validate_candidate(&candidate) {
            Ok(q) => q,
            Err(e) => {
                warnings.push(format!("schema error: {e}"));
                return None;
            }
        };

        let audit = audit(&question, &self.config.distractor_band);
        warnings.extend(audit.advisories);
        if let Some(rejection) = audit.rejection {
            warnings.push(rejection);
            return None;
        }

        let score = index.score(&question_text(&question));
        if score < self.config.min_grounding {
            let shown = round2(score);
            warnings.push(format!("low grounding ({shown:.2}) id={}", question.id));
            return None;
        }

        question.quality = Some(round2(score));
        Some(question)
    }
}

/// `Generated mixed types: mcq: 2 (67%), tf: 1 (33%)`
fn type_distribution(counts: &IndexMap<QuestionType, usize>, total: usize) -> String {
    let parts: Vec<String> = counts
        .iter()
        .map(|(kind, &count)| {
            let pct = (count as f64 / total as f64 * 100.0).round();
            format!("{kind}: {count} ({pct}%)")
        })
        .collect();
    format!("{SUMMARY_PREFIX}{}", parts.join(", "))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
