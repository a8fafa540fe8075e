//! Shape validation: normalized candidate → typed [`Question`].
//!
//! Decoding picks the variant from the `type` tag; each variant then has its
//! own checker for cardinalities, index bounds, and cross-field rules. The
//! first violation rejects the whole candidate.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::model::{
    Cloze, FillIn, Matching, MultiChoice, Question, QuestionBody, Sequence, SingleChoice,
};

/// Gap marker a `complete` prompt must contain.
pub const PLACEHOLDER: &str = "__";

const MIN_PROMPT_CHARS: usize = 10;
const MIN_EXPLANATION_CHARS: usize = 5;
const MAX_COMPLETE_ANSWER_CHARS: usize = 20;
const MAX_CLOZE_BLANKS: usize = 3;
const MIN_MATCH_PAIRS: usize = 3;

/// Decode and check a normalized candidate.
///
/// Any `quality` carried by the candidate is discarded; quality is only ever
/// assigned by the grounding stage.
pub fn validate_candidate(candidate: &Value) -> Result<Question, SchemaError> {
    let mut candidate = candidate.clone();
    if let Value::Object(fields) = &mut candidate {
        fields.remove("quality");
    }
    let question =
        Question::deserialize(&candidate).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    check_question(&question)?;
    Ok(question)
}

/// Check the structural invariants of an already-typed question.
pub fn check_question(question: &Question) -> Result<(), SchemaError> {
    if question.id.is_empty() {
        return Err(SchemaError::constraint("id", "must not be empty"));
    }
    check_min_chars("prompt", &question.prompt, MIN_PROMPT_CHARS)?;
    check_min_chars("explanation", &question.explanation, MIN_EXPLANATION_CHARS)?;

    match &question.body {
        QuestionBody::Mcq(c) | QuestionBody::McqSingle(c) => check_single_choice(c),
        QuestionBody::McqMulti(c) => check_multi_choice(c),
        QuestionBody::Tf(_) => Ok(()),
        QuestionBody::Complete(f) => check_fill_in(f, &question.prompt),
        QuestionBody::Cloze(c) => check_cloze(c),
        QuestionBody::Match(m) => check_matching(m),
        QuestionBody::Order(s) => check_sequence(s),
    }
}

fn check_min_chars(path: &str, text: &str, min: usize) -> Result<(), SchemaError> {
    let len = text.chars().count();
    if len < min {
        return Err(SchemaError::constraint(
            path,
            format!("must be at least {min} characters, got {len}"),
        ));
    }
    Ok(())
}

fn check_count(
    path: &str,
    what: &str,
    len: usize,
    min: usize,
    max: Option<usize>,
) -> Result<(), SchemaError> {
    let in_range = len >= min && max.map_or(true, |max| len <= max);
    if in_range {
        return Ok(());
    }
    let expected = match max {
        Some(max) => format!("between {min} and {max}"),
        None => format!("at least {min}"),
    };
    Err(SchemaError::constraint(
        path,
        format!("expected {expected} {what}, got {len}"),
    ))
}

fn check_index(path: &str, index: usize, len: usize, what: &str) -> Result<(), SchemaError> {
    if index >= len {
        return Err(SchemaError::constraint(
            path,
            format!("index {index} is out of range for {len} {what}"),
        ));
    }
    Ok(())
}

fn check_single_choice(c: &SingleChoice) -> Result<(), SchemaError> {
    check_count("choices", "items", c.choices.len(), 3, Some(5))?;
    check_index("answer", c.answer, c.choices.len(), "choices")
}

fn check_multi_choice(c: &MultiChoice) -> Result<(), SchemaError> {
    check_count("choices", "items", c.choices.len(), 4, Some(6))?;
    check_count("answer", "indices", c.answer.len(), 2, Some(3))?;

    let mut seen = HashSet::new();
    for (i, &index) in c.answer.iter().enumerate() {
        check_index(&format!("answer[{i}]"), index, c.choices.len(), "choices")?;
        if !seen.insert(index) {
            return Err(SchemaError::constraint(
                format!("answer[{i}]"),
                format!("index {index} is listed more than once"),
            ));
        }
    }
    Ok(())
}

fn check_fill_in(f: &FillIn, prompt: &str) -> Result<(), SchemaError> {
    let len = f.answer.chars().count();
    if len == 0 || len > MAX_COMPLETE_ANSWER_CHARS {
        return Err(SchemaError::constraint(
            "answer",
            format!("expected 1 to {MAX_COMPLETE_ANSWER_CHARS} characters, got {len}"),
        ));
    }
    if !prompt.contains(PLACEHOLDER) {
        return Err(SchemaError::constraint(
            "prompt",
            format!("must contain the {PLACEHOLDER} placeholder"),
        ));
    }
    Ok(())
}

fn check_cloze(c: &Cloze) -> Result<(), SchemaError> {
    check_count("choices", "blanks", c.choices.len(), 1, Some(MAX_CLOZE_BLANKS))?;
    for (key, options) in &c.choices {
        check_count(&format!("choices.{key}"), "options", options.len(), 2, None)?;
    }
    for (key, &index) in &c.answer {
        let path = format!("answer.{key}");
        let Some(options) = c.choices.get(key) else {
            return Err(SchemaError::constraint(path, "blank key not in choices"));
        };
        check_index(&path, index, options.len(), "options")?;
    }
    Ok(())
}

fn check_matching(m: &Matching) -> Result<(), SchemaError> {
    check_count("pairs", "pairs", m.pairs.len(), MIN_MATCH_PAIRS, None)?;
    for (i, pair) in m.pairs.iter().enumerate() {
        let len = pair.right_options.len();
        check_count(&format!("pairs[{i}].rightOptions"), "options", len, 2, None)?;
        check_index(&format!("pairs[{i}].answer"), pair.answer, len, "options")?;
    }
    Ok(())
}

fn check_sequence(s: &Sequence) -> Result<(), SchemaError> {
    let n = s.choices.len();
    check_count("choices", "items", n, 3, None)?;

    let distinct: HashSet<usize> = s.answer.iter().copied().collect();
    let is_permutation =
        s.answer.len() == n && distinct.len() == n && s.answer.iter().all(|&i| i < n);
    if !is_permutation {
        return Err(SchemaError::constraint(
            "answer",
            format!("must be a permutation of 0..{n} (each index exactly once)"),
        ));
    }
    Ok(())
}
