//! Structural repair of raw candidates before validation.
//!
//! Normalization never fails. It fills in a missing `id` and flattens
//! map-shaped `choices` on multiple-choice types; every other field is left
//! for the validator to judge.

use std::collections::HashSet;

use serde_json::Value;

use crate::ids::IdGenerator;
use crate::model::QuestionType;

/// Redraws attempted on a generated-id collision before falling back to a
/// numeric suffix.
const MAX_REDRAWS: usize = 16;

/// Per-batch normalizer. Tracks the ids it has generated so that no two
/// generated ids in one batch collide, ignoring case.
pub struct Normalizer<'a> {
    ids: &'a mut dyn IdGenerator,
    issued: HashSet<String>,
}

impl<'a> Normalizer<'a> {
    pub fn new(ids: &'a mut dyn IdGenerator) -> Self {
        Self {
            ids,
            issued: HashSet::new(),
        }
    }

    /// Normalize one candidate. Non-object values pass through unchanged.
    pub fn normalize(&mut self, candidate: Value) -> Value {
        let mut fields = match candidate {
            Value::Object(fields) => fields,
            other => return other,
        };

        if id_missing(fields.get("id")) {
            let id = self.fresh_id();
            fields.insert("id".to_string(), Value::String(id));
        }

        let choice_family = fields
            .get("type")
            .and_then(Value::as_str)
            .and_then(|t| t.parse::<QuestionType>().ok())
            .is_some_and(|t| t.is_choice_family());

        if choice_family {
            if let Some(choices) = fields.get_mut("choices") {
                if let Value::Object(keyed) = choices {
                    let flat = std::mem::take(keyed).into_iter().map(|(_, v)| v).collect();
                    *choices = Value::Array(flat);
                }
            }
        }

        Value::Object(fields)
    }

    fn fresh_id(&mut self) -> String {
        let mut id = self.ids.next_id();
        for _ in 0..MAX_REDRAWS {
            if !self.issued.contains(&id.to_lowercase()) {
                break;
            }
            id = self.ids.next_id();
        }

        let base = id.clone();
        let mut n = 1;
        while self.issued.contains(&id.to_lowercase()) {
            id = format!("{base}_{n}");
            n += 1;
        }

        self.issued.insert(id.to_lowercase());
        id
    }
}

fn id_missing(id: Option<&Value>) -> bool {
    match id {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use serde_json::json;

    struct FixedIds(&'static str);

    impl IdGenerator for FixedIds {
        fn next_id(&mut self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn assigns_missing_and_empty_ids() {
        let mut ids = SequentialIdGenerator::new("gen");
        let mut normalizer = Normalizer::new(&mut ids);

        let a = normalizer.normalize(json!({"type": "tf"}));
        let b = normalizer.normalize(json!({"type": "tf", "id": ""}));
        let c = normalizer.normalize(json!({"type": "tf", "id": null}));

        assert_eq!(a["id"], "gen1");
        assert_eq!(b["id"], "gen2");
        assert_eq!(c["id"], "gen3");
    }

    #[test]
    fn keeps_existing_id() {
        let mut ids = SequentialIdGenerator::new("gen");
        let mut normalizer = Normalizer::new(&mut ids);
        let q = normalizer.normalize(json!({"type": "tf", "id": "mine"}));
        assert_eq!(q["id"], "mine");
    }

    #[test]
    fn generated_ids_are_unique_ignoring_case() {
        let mut ids = FixedIds("Q_SAME");
        let mut normalizer = Normalizer::new(&mut ids);
        let a = normalizer.normalize(json!({}));
        let b = normalizer.normalize(json!({}));
        assert_eq!(a["id"], "Q_SAME");
        assert_eq!(b["id"], "Q_SAME_1");
    }

    #[test]
    fn flattens_keyed_choices_in_key_order() {
        let mut ids = SequentialIdGenerator::new("gen");
        let mut normalizer = Normalizer::new(&mut ids);
        let q = normalizer.normalize(json!({
            "type": "mcq",
            "id": "m1",
            "choices": {"c": "third", "a": "first", "b": "second"}
        }));
        assert_eq!(q["choices"], json!(["third", "first", "second"]));
    }

    #[test]
    fn leaves_cloze_choices_keyed() {
        let mut ids = SequentialIdGenerator::new("gen");
        let mut normalizer = Normalizer::new(&mut ids);
        let q = normalizer.normalize(json!({
            "type": "cloze",
            "id": "c1",
            "choices": {"A": ["x", "y"]}
        }));
        assert!(q["choices"].is_object());
    }

    #[test]
    fn non_objects_pass_through() {
        let mut ids = SequentialIdGenerator::new("gen");
        let mut normalizer = Normalizer::new(&mut ids);
        assert_eq!(normalizer.normalize(json!(42)), json!(42));
        assert_eq!(normalizer.normalize(json!("text")), json!("text"));
    }
}
