//! Response envelope with JSON persistence.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::BatchOutcome;
use crate::model::Question;

/// What a generation call hands back to its client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub ok: bool,
    /// Label of whatever produced the candidates.
    pub provider: String,
    /// Wall-clock time for the whole call in milliseconds.
    pub duration_ms: u64,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl GenerateResponse {
    pub fn from_outcome(provider: &str, elapsed: Duration, outcome: BatchOutcome) -> Self {
        Self {
            ok: true,
            provider: provider.to_string(),
            duration_ms: elapsed.as_millis() as u64,
            questions: outcome.questions,
            warnings: outcome.warnings,
        }
    }

    /// Save the response as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize response")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write response to {}", path.display()))?;
        Ok(())
    }

    /// Load a response from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read response from {}", path.display()))?;
        let response: GenerateResponse =
            serde_json::from_str(&content).context("failed to parse response JSON")?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use crate::QuizGate;
    use serde_json::json;

    fn outcome() -> BatchOutcome {
        let raw = json!([{
            "type": "order",
            "prompt": "put the brewing steps in order",
            "explanation": "grind then tamp then brew",
            "difficulty": "medium",
            "choices": ["grind", "tamp", "brew"],
            "answer": [0, 1, 2]
        }]);
        let mut ids = SequentialIdGenerator::new("r");
        QuizGate::default().evaluate_with_ids(
            &raw,
            "put the brewing steps in order grind then tamp then brew",
            &mut ids,
        )
    }

    #[test]
    fn envelope_uses_camel_case() {
        let response =
            GenerateResponse::from_outcome("offline", Duration::from_millis(12), outcome());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["provider"], "offline");
        assert_eq!(value["durationMs"], 12);
        assert_eq!(value["questions"][0]["id"], "r1");
        assert_eq!(value["questions"][0]["quality"], 1.0);
        assert_eq!(value["warnings"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn save_and_load_keeps_quality() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("response.json");
        let response = GenerateResponse::from_outcome("offline", Duration::ZERO, outcome());
        response.save_json(&path).unwrap();

        let loaded = GenerateResponse::load_json(&path).unwrap();
        assert_eq!(loaded.questions, response.questions);
        assert_eq!(loaded.questions[0].quality, Some(1.0));
        assert_eq!(loaded.warnings, response.warnings);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(GenerateResponse::load_json(Path::new("no/such/response.json")).is_err());
    }
}
