//! End-to-end engine tests: raw model output through extraction, validation,
//! auditing, and grounding, checked against the batch-level guarantees.

use std::collections::HashSet;

use quizgate_core::engine::EngineConfig;
use quizgate_core::extract::parse_candidates;
use quizgate_core::grounding::{grounding_score, question_text, round2};
use quizgate_core::ids::SequentialIdGenerator;
use quizgate_core::{BatchOutcome, QuestionBody, QuizGate};
use serde_json::{json, Value};

const CONTEXT: &str = "grind tamp brew pull espresso latte milk foam water coffee beans \
                       roast dark steam pressure hot cold the order of steps drink has \
                       which is a and match";

fn evaluate(raw: &Value, context: &str) -> BatchOutcome {
    let mut ids = SequentialIdGenerator::new("e2e");
    QuizGate::default().evaluate_with_ids(raw, context, &mut ids)
}

/// Twelve candidates: six valid and grounded, five broken, one ungrounded.
fn mixed_batch() -> Value {
    json!([
        {
            "type": "mcq", "id": "m1", "difficulty": "easy",
            "prompt": "which drink has foam", "explanation": "latte has foam",
            "choices": ["latte", "water", "beans"], "answer": 0
        },
        {
            "type": "mcq", "id": "m2", "difficulty": "easy",
            "prompt": "which drink has foam", "explanation": "latte has foam",
            "choices": ["latte", "latte", "beans"], "answer": 0
        },
        {
            "type": "mcq_single", "id": "m3", "difficulty": "easy",
            "prompt": "which drink has foam", "explanation": "latte has foam",
            "choices": ["latte", "water", "beans"], "answer": 5
        },
        {
            "type": "order", "id": "o1", "difficulty": "medium",
            "prompt": "the order of steps", "explanation": "grind tamp brew",
            "choices": ["grind", "tamp", "brew"], "answer": [2, 0, 1]
        },
        {
            "type": "order", "id": "o2", "difficulty": "medium",
            "prompt": "the order of steps", "explanation": "grind tamp brew",
            "choices": ["grind", "tamp", "brew"], "answer": [0, 0, 1]
        },
        {
            "type": "cloze", "id": "c1", "difficulty": "hard",
            "prompt": "espresso is [b1] and milk is [b2]", "explanation": "espresso is hot",
            "choices": {"b1": ["hot", "cold"], "b2": ["steam", "foam"]},
            "answer": {"b1": 0, "b2": 1}
        },
        {
            "type": "cloze", "id": "c2", "difficulty": "hard",
            "prompt": "espresso is [b1] and milk is [b2]", "explanation": "espresso is hot",
            "choices": {"b1": ["hot", "cold"]},
            "answer": {"b3": 0}
        },
        {
            "type": "tf", "id": "t1", "difficulty": "easy",
            "prompt": "espresso is a drink", "explanation": "espresso is coffee",
            "answer": true
        },
        {
            "type": "match", "id": "p1", "difficulty": "medium",
            "prompt": "match the drink", "explanation": "latte has milk",
            "pairs": [
                {"left": "latte", "rightOptions": ["milk", "water"], "answer": 0},
                {"left": "espresso", "rightOptions": ["pressure", "foam"], "answer": 0},
                {"left": "roast", "rightOptions": ["dark", "cold"], "answer": 0}
            ]
        },
        {
            "type": "complete", "id": "f1", "difficulty": "easy",
            "prompt": "espresso is brewed hot", "explanation": "espresso is hot",
            "answer": "hot"
        },
        {
            "type": "tf", "id": "t2", "difficulty": "hard",
            "prompt": "quantum gluon exchange", "explanation": "gluons bind quarks",
            "answer": false
        },
        {
            "type": "mcq_multi", "id": "x1", "difficulty": "medium",
            "prompt": "which is a step", "explanation": "grind and brew",
            "choices": ["grind", "tamp", "brew", "pull"], "answer": [0, 2]
        }
    ])
}

// --- Scenarios ---

#[test]
fn scenario_grounded_true_false_is_accepted() {
    let raw = json!([{
        "type": "tf",
        "id": "t1",
        "prompt": "JS runs in browsers, true or false?",
        "explanation": "It does.",
        "difficulty": "easy",
        "answer": true
    }]);
    let context = "JavaScript runs in browsers.";

    // Exact token matching grounds only "runs" and "in": 2 of 9 tokens.
    let strict = evaluate(&raw, context);
    assert!(strict.questions.is_empty());
    assert_eq!(strict.warnings, vec!["low grounding (0.22) id=t1"]);

    let gate = QuizGate::new(EngineConfig::default().with_min_grounding(Some(0.2)));
    let mut ids = SequentialIdGenerator::new("e2e");
    let outcome = gate.evaluate_with_ids(&raw, context, &mut ids);
    assert_eq!(outcome.questions.len(), 1);
    let quality = outcome.questions[0].quality.unwrap();
    assert!(quality > 0.0);
    assert_eq!(quality, 0.22);
}

#[test]
fn scenario_broken_permutation_never_reaches_grounding() {
    let raw = json!([{
        "type": "order",
        "id": "o1",
        "prompt": "put the letters in order",
        "explanation": "alphabetical",
        "difficulty": "easy",
        "choices": ["a", "b", "c"],
        "answer": [0, 0, 1]
    }]);
    let outcome = evaluate(&raw, "a b c put the letters in order alphabetical");
    assert!(outcome.questions.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("permutation"));
    assert!(!outcome.warnings[0].contains("low grounding"));
}

#[test]
fn scenario_complete_without_placeholder_is_rejected() {
    let raw = json!([{
        "type": "complete",
        "id": "f1",
        "prompt": "The capital of France is Paris.",
        "explanation": "Paris is the capital.",
        "difficulty": "easy",
        "answer": "Paris"
    }]);
    let outcome = evaluate(&raw, "The capital of France is Paris.");
    assert!(outcome.questions.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("placeholder"));
}

#[test]
fn scenario_empty_batch() {
    let outcome = evaluate(&json!([]), CONTEXT);
    assert!(outcome.questions.is_empty());
    assert!(outcome.warnings.is_empty());
    assert!(outcome.type_counts.is_empty());
}

#[test]
fn scenario_two_pass_one_ungrounded() {
    let raw = json!([
        {
            "type": "tf", "id": "t1", "difficulty": "easy",
            "prompt": "espresso is a drink", "explanation": "espresso is coffee",
            "answer": true
        },
        {
            "type": "tf", "id": "t2", "difficulty": "hard",
            "prompt": "quantum gluon exchange", "explanation": "gluons bind quarks",
            "answer": false
        },
        {
            "type": "order", "id": "o1", "difficulty": "medium",
            "prompt": "the order of steps", "explanation": "grind tamp brew",
            "choices": ["grind", "tamp", "brew"], "answer": [0, 1, 2]
        }
    ]);
    let outcome = evaluate(&raw, CONTEXT);
    assert_eq!(outcome.questions.len(), 2);
    assert_eq!(
        outcome.warnings,
        vec![
            "low grounding (0.00) id=t2",
            "Generated mixed types: tf: 1 (50%), order: 1 (50%)",
        ]
    );
}

// --- Batch properties ---

#[test]
fn accepted_questions_satisfy_variant_invariants() {
    let outcome = evaluate(&mixed_batch(), CONTEXT);
    let accepted: Vec<&str> = outcome.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(accepted, vec!["m1", "o1", "c1", "t1", "p1", "x1"]);

    for q in &outcome.questions {
        let quality = q.quality.unwrap();
        assert!((0.0..=1.0).contains(&quality), "{}: {quality}", q.id);
        assert_eq!(
            quality,
            round2(grounding_score(&question_text(q), CONTEXT)),
            "{}",
            q.id
        );

        match &q.body {
            QuestionBody::Order(s) => {
                let mut sorted = s.answer.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, (0..s.choices.len()).collect::<Vec<_>>());
            }
            QuestionBody::Mcq(c) | QuestionBody::McqSingle(c) => {
                assert!(c.answer < c.choices.len());
                let distinct: HashSet<&String> = c.choices.iter().collect();
                assert_eq!(distinct.len(), c.choices.len());
            }
            QuestionBody::Cloze(c) => {
                for (key, &index) in &c.answer {
                    let options = c.choices.get(key).unwrap();
                    assert!(index < options.len());
                }
            }
            _ => {}
        }
    }
}

#[test]
fn every_candidate_accounted_for_once() {
    let raw = mixed_batch();
    let outcome = evaluate(&raw, CONTEXT);
    let per_candidate = outcome.warnings.len() - 1;
    assert!(outcome.summary().is_some());
    assert_eq!(
        outcome.questions.len() + per_candidate,
        raw.as_array().unwrap().len()
    );
}

#[test]
fn rejections_are_reported_in_input_order() {
    let outcome = evaluate(&mixed_batch(), CONTEXT);
    let warnings = &outcome.warnings;
    assert_eq!(warnings[0], "mcq duplicate choices id=m2");
    assert!(warnings[1].starts_with("schema error: answer: index 5 is out of range"));
    assert!(warnings[2].starts_with("schema error: answer: must be a permutation"));
    assert_eq!(warnings[3], "schema error: answer.b3: blank key not in choices");
    assert!(warnings[4].starts_with("schema error: prompt: must contain the __ placeholder"));
    assert_eq!(warnings[5], "low grounding (0.00) id=t2");
    assert_eq!(
        warnings[6],
        "Generated mixed types: mcq: 1 (17%), order: 1 (17%), cloze: 1 (17%), tf: 1 (17%), \
         match: 1 (17%), mcq_multi: 1 (17%)"
    );
}

#[test]
fn revalidation_is_idempotent() {
    let first = evaluate(&mixed_batch(), CONTEXT);
    let resubmitted = Value::Array(
        first
            .questions
            .iter()
            .map(|q| serde_json::to_value(q).unwrap())
            .collect(),
    );

    let second = evaluate(&resubmitted, CONTEXT);
    assert_eq!(second.questions, first.questions);
    assert_eq!(second.warnings.last(), first.warnings.last());
}

#[test]
fn fenced_model_output_runs_end_to_end() {
    let content = format!(
        "Sure! Here is the quiz:\n```json\n{}\n```",
        serde_json::to_string_pretty(&mixed_batch()).unwrap()
    );
    let candidates = parse_candidates(&content);
    assert_eq!(candidates.len(), 12);

    let mut ids = SequentialIdGenerator::new("e2e");
    let outcome = QuizGate::default().evaluate_candidates(&candidates, CONTEXT, &mut ids);
    assert_eq!(outcome.questions.len(), 6);
}

#[test]
fn generated_ids_do_not_collide() {
    let candidate = json!({
        "type": "tf", "difficulty": "easy",
        "prompt": "espresso is a drink", "explanation": "espresso is coffee",
        "answer": true
    });
    let raw = Value::Array(vec![candidate; 5]);
    let outcome = QuizGate::default().evaluate(&raw, CONTEXT);
    assert_eq!(outcome.questions.len(), 5);

    let ids: HashSet<String> = outcome
        .questions
        .iter()
        .map(|q| q.id.to_lowercase())
        .collect();
    assert_eq!(ids.len(), 5);
    assert!(outcome.questions.iter().all(|q| q.id.starts_with("q_")));
}
