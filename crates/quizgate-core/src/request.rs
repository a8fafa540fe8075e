//! Generation request shape.
//!
//! A request names how many questions of which type to generate and carries
//! the source material they must be grounded in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;
use crate::model::{Difficulty, QuestionType};

/// Maximum questions per request.
pub const MAX_COUNT: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub params: GenerateParams,
    pub context: RequestContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_refs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub count: u32,
    #[serde(rename = "type")]
    pub requested: RequestedType,
    pub difficulty: Difficulty,
    pub locale: Locale,
    /// Explicit type mix; when absent the generator picks types itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_types: Option<Vec<String>>,
}

/// Source material: free text plus optional structured facts, steps, and
/// definitions in whatever JSON shape the caller uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ru,
    En,
}

/// A single question type, or `mixed` to let the generator choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequestedType {
    Mixed,
    Only(QuestionType),
}

impl fmt::Display for RequestedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedType::Mixed => write!(f, "mixed"),
            RequestedType::Only(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for RequestedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "mixed" {
            return Ok(RequestedType::Mixed);
        }
        s.parse().map(RequestedType::Only)
    }
}

impl TryFrom<String> for RequestedType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RequestedType> for String {
    fn from(t: RequestedType) -> Self {
        t.to_string()
    }
}

impl GenerateRequest {
    /// Decode and check a request body.
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        let request: GenerateRequest =
            serde_json::from_str(body).map_err(|e| RequestError::Malformed(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), RequestError> {
        let count = self.params.count;
        if !(1..=MAX_COUNT).contains(&count) {
            return Err(RequestError::CountOutOfRange(count));
        }
        for name in self.params.question_types.iter().flatten() {
            if name.parse::<QuestionType>().is_err() {
                return Err(RequestError::UnknownQuestionType(name.clone()));
            }
        }
        Ok(())
    }
}
