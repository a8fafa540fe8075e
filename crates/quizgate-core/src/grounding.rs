//! Grounding score: how much of a question's wording appears in the source
//! context.
//!
//! The score is a token-overlap ratio. Both texts are lowercased and split on
//! whitespace; a question token counts as grounded when the exact token also
//! occurs somewhere in the context. Word order, stemming, and punctuation are
//! ignored, so this is a coarse filter against invented content rather than a
//! proof of correctness.

use std::collections::HashSet;

use crate::model::{Question, QuestionBody};

/// Minimum score for a question to be accepted unless configured otherwise.
pub const DEFAULT_MIN_GROUNDING: f64 = 0.25;

/// Token set of a context text, built once per batch.
#[derive(Debug, Clone, Default)]
pub struct ContextIndex {
    tokens: HashSet<String>,
}

impl ContextIndex {
    pub fn new(context_text: &str) -> Self {
        let tokens = context_text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Distinct tokens in the context.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Fraction of `question_text` tokens found in the context, in `[0, 1]`.
    ///
    /// Returns 0 when either side has no tokens.
    pub fn score(&self, question_text: &str) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let lowered = question_text.to_lowercase();
        let mut total = 0usize;
        let mut matched = 0usize;
        for token in lowered.split_whitespace() {
            total += 1;
            if self.tokens.contains(token) {
                matched += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }
        matched as f64 / total as f64
    }
}

/// One-off score of `question_text` against `context_text`.
pub fn grounding_score(question_text: &str, context_text: &str) -> f64 {
    ContextIndex::new(context_text).score(question_text)
}

/// All learner-visible text of a question, lowercased and space-joined:
/// prompt, explanation, source, flat choices, match pairs, cloze options.
pub fn question_text(question: &Question) -> String {
    let mut parts = vec![question.prompt.as_str(), question.explanation.as_str()];
    if let Some(source) = &question.source {
        parts.push(source);
    }

    match &question.body {
        QuestionBody::Mcq(c) | QuestionBody::McqSingle(c) => {
            parts.extend(c.choices.iter().map(String::as_str));
        }
        QuestionBody::McqMulti(c) => parts.extend(c.choices.iter().map(String::as_str)),
        QuestionBody::Order(s) => parts.extend(s.choices.iter().map(String::as_str)),
        QuestionBody::Match(m) => {
            for pair in &m.pairs {
                parts.push(&pair.left);
                parts.extend(pair.right_options.iter().map(String::as_str));
            }
        }
        QuestionBody::Cloze(c) => {
            for options in c.choices.values() {
                parts.extend(options.iter().map(String::as_str));
            }
        }
        QuestionBody::Tf(_) | QuestionBody::Complete(_) => {}
    }

    parts.join(" ").to_lowercase()
}

/// Round to two decimal places, the precision quality is reported at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
