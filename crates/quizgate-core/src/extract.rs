//! Candidate extraction from raw model output.
//!
//! Models are asked for a bare JSON array but often wrap it in prose or code
//! fences, or nest it under a `questions` key. Extraction is best-effort and
//! never fails: anything unrecoverable yields an empty batch.

use serde_json::Value;

/// Pull the candidate sequence out of a model's text response.
///
/// Handles:
/// - A JSON array (returned as-is)
/// - A JSON object with a `questions` array
/// - Either of the above embedded in surrounding text, located by the span
///   from the first `[` to the last `]`
pub fn parse_candidates(content: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(content.trim()) {
        Ok(value) => candidates_from(value).unwrap_or_else(|| {
            tracing::warn!("model output is JSON but holds no candidate array");
            Vec::new()
        }),
        Err(e) => {
            tracing::warn!("model output is not valid JSON ({e}), trying embedded array");
            bracketed_span(content)
                .and_then(|span| serde_json::from_str::<Value>(span).ok())
                .and_then(candidates_from)
                .unwrap_or_else(|| {
                    tracing::warn!("no candidate array recovered from model output");
                    Vec::new()
                })
        }
    }
}

fn candidates_from(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut fields) => match fields.remove("questions") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// The widest `[ ... ]` span in `content`.
fn bracketed_span(content: &str) -> Option<&str> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    (end > start).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_array() {
        let items = parse_candidates(r#"[{"type": "tf"}, {"type": "mcq"}]"#);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["type"], "mcq");
    }

    #[test]
    fn questions_object() {
        let items = parse_candidates(r#"{"questions": [{"type": "tf"}]}"#);
        assert_eq!(items, vec![json!({"type": "tf"})]);
    }

    #[test]
    fn object_without_questions_is_empty() {
        assert!(parse_candidates(r#"{"items": [1, 2]}"#).is_empty());
        assert!(parse_candidates("42").is_empty());
    }

    #[test]
    fn fenced_array() {
        let content = "Here are your questions:\n\n```json\n[{\"type\": \"order\"}]\n```\nEnjoy!";
        let items = parse_candidates(content);
        assert_eq!(items, vec![json!({"type": "order"})]);
    }

    #[test]
    fn nested_brackets_use_outermost_span() {
        let content = "Output: [{\"type\": \"order\", \"answer\": [2, 0, 1]}] done";
        let items = parse_candidates(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["answer"], json!([2, 0, 1]));
    }

    #[test]
    fn garbage_is_empty() {
        assert!(parse_candidates("I cannot help with that.").is_empty());
        assert!(parse_candidates("] backwards [").is_empty());
        assert!(parse_candidates("[not json at all]").is_empty());
        assert!(parse_candidates("").is_empty());
    }
}
