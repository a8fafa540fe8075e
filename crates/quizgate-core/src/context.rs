//! Context assembly: flatten a request's source material into the single
//! text that questions are grounded against.

use serde_json::{Map, Value};

use crate::request::RequestContext;

/// Default cap on assembled context length, in characters.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 50_000;

/// Join the free text and the structured material, then cap the length.
///
/// The structured part is always present as a JSON object holding whichever
/// of `facts`, `steps`, and `definitions` were supplied (possibly `{}`).
pub fn assemble_context(context: &RequestContext, max_chars: usize) -> String {
    let mut structured = Map::new();
    let sections = [
        ("facts", &context.facts),
        ("steps", &context.steps),
        ("definitions", &context.definitions),
    ];
    for (key, items) in sections {
        if let Some(items) = items {
            structured.insert(key.to_string(), Value::Array(items.clone()));
        }
    }

    let mut parts = Vec::with_capacity(2);
    if let Some(text) = context.text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(text.to_string());
    }
    parts.push(Value::Object(structured).to_string());

    truncate_chars(&parts.join("\n"), max_chars)
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_and_facts() {
        let context = RequestContext {
            text: Some("Espresso needs pressure.".into()),
            facts: Some(vec![json!({"pressure": "9 bar"})]),
            steps: None,
            definitions: Some(vec![json!("crema: foam")]),
        };
        assert_eq!(
            assemble_context(&context, DEFAULT_MAX_CONTEXT_CHARS),
            "Espresso needs pressure.\n{\"facts\":[{\"pressure\":\"9 bar\"}],\"definitions\":[\"crema: foam\"]}"
        );
    }

    #[test]
    fn empty_context_is_empty_object() {
        assert_eq!(assemble_context(&RequestContext::default(), 100), "{}");
    }

    #[test]
    fn empty_text_is_skipped() {
        let context = RequestContext {
            text: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(assemble_context(&context, 100), "{}");
    }

    #[test]
    fn truncates_by_characters() {
        let context = RequestContext {
            text: Some("ééééé".into()),
            ..Default::default()
        };
        assert_eq!(assemble_context(&context, 3), "ééé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
