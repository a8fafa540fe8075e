//! Per-variant heuristic checks that go beyond structural typing.
//!
//! An audit never fails outright: it yields advisory warnings (the question
//! still proceeds) and at most one rejection. Every message is tagged
//! `<variant> <reason> id=<id>`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionBody};
use crate::validate::PLACEHOLDER;

/// Allowed spread of choice lengths around their mean, as multiples of the
/// mean. Choices outside `[lower * mean, upper * mean]` are "uneven".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistractorBand {
    #[serde(default = "default_lower")]
    pub lower: f64,
    #[serde(default = "default_upper")]
    pub upper: f64,
}

fn default_lower() -> f64 {
    0.6
}

fn default_upper() -> f64 {
    1.4
}

impl Default for DistractorBand {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper: default_upper(),
        }
    }
}

impl DistractorBand {
    /// Whether any choice length falls outside the band around the mean.
    pub fn is_uneven(&self, choices: &[String]) -> bool {
        let lengths: Vec<f64> = choices.iter().map(|c| c.chars().count() as f64).collect();
        let mean = lengths.iter().sum::<f64>() / lengths.len().max(1) as f64;
        lengths
            .iter()
            .any(|&len| len < mean * self.lower || len > mean * self.upper)
    }
}

/// Result of auditing one question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Audit {
    /// Non-fatal findings, in the order they were raised.
    pub advisories: Vec<String>,
    /// Set when the question must be dropped.
    pub rejection: Option<String>,
}

impl Audit {
    pub fn passed(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Run the heuristic checks for the question's variant.
pub fn audit(question: &Question, band: &DistractorBand) -> Audit {
    let tag = |reason: &str| format!("{} {reason} id={}", question.kind(), question.id);
    let mut audit = Audit::default();

    let rejection = match &question.body {
        QuestionBody::Mcq(c) | QuestionBody::McqSingle(c) => {
            if has_duplicates(&c.choices) {
                Some("duplicate choices")
            } else if c.answer >= c.choices.len() {
                Some("invalid answer")
            } else {
                if band.is_uneven(&c.choices) {
                    audit.advisories.push(tag("uneven distractors"));
                }
                None
            }
        }
        QuestionBody::McqMulti(c) => {
            if band.is_uneven(&c.choices) {
                audit.advisories.push(tag("uneven distractors"));
            }
            let correct: HashSet<usize> = c.answer.iter().copied().collect();
            (correct.len() < 2).then_some("needs >=2 correct")
        }
        QuestionBody::Order(s) => {
            let distinct: HashSet<usize> = s.answer.iter().copied().collect();
            (distinct.len() != s.choices.len()).then_some("answer must be permutation")
        }
        QuestionBody::Match(m) => (m.pairs.len() < 3).then_some("needs >=3 pairs"),
        QuestionBody::Complete(_) => {
            (!question.prompt.contains(PLACEHOLDER)).then_some("requires __ placeholder")
        }
        QuestionBody::Cloze(c) => {
            (c.choices.is_empty() || c.choices.len() > 3).then_some("supports 1..3 blanks")
        }
        QuestionBody::Tf(_) => None,
    };

    audit.rejection = rejection.map(tag);
    audit
}

fn has_duplicates(choices: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(choices.len());
    choices.iter().any(|c| !seen.insert(c.as_str()))
}
