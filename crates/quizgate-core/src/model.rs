//! Question data model.
//!
//! A question is a common envelope (id, prompt, explanation, ...) plus exactly
//! one variant body selected by the wire field `type`. The wire shape is flat:
//! envelope and body fields sit side by side in one JSON object.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A validated quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Opaque identifier, unique within a batch.
    pub id: String,
    /// The question text shown to the learner.
    pub prompt: String,
    /// Why the answer is correct.
    pub explanation: String,
    /// Where in the source material the question comes from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Variant-specific fields, including the `type` tag.
    #[serde(flatten)]
    pub body: QuestionBody,
    /// Grounding score rounded to two decimals; set only once the question
    /// has been accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl Question {
    pub fn kind(&self) -> QuestionType {
        self.body.kind()
    }
}

/// The variant-specific part of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    /// Single-answer multiple choice (legacy alias of `mcq_single`).
    Mcq(SingleChoice),
    McqSingle(SingleChoice),
    McqMulti(MultiChoice),
    Tf(TrueFalse),
    Complete(FillIn),
    Cloze(Cloze),
    Match(Matching),
    Order(Sequence),
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionType {
        match self {
            QuestionBody::Mcq(_) => QuestionType::Mcq,
            QuestionBody::McqSingle(_) => QuestionType::McqSingle,
            QuestionBody::McqMulti(_) => QuestionType::McqMulti,
            QuestionBody::Tf(_) => QuestionType::Tf,
            QuestionBody::Complete(_) => QuestionType::Complete,
            QuestionBody::Cloze(_) => QuestionType::Cloze,
            QuestionBody::Match(_) => QuestionType::Match,
            QuestionBody::Order(_) => QuestionType::Order,
        }
    }
}

/// `mcq` / `mcq_single`: 3–5 choices, one correct index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleChoice {
    pub choices: Vec<String>,
    #[serde(deserialize_with = "index::one")]
    pub answer: usize,
}

/// `mcq_multi`: 4–6 choices, 2–3 correct indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiChoice {
    pub choices: Vec<String>,
    #[serde(deserialize_with = "index::many")]
    pub answer: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFalse {
    pub answer: bool,
}

/// `complete`: a single `__` gap in the prompt, answered with a short string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillIn {
    pub answer: String,
}

/// `cloze`: several named blanks, each with its own option list.
///
/// Keys keep the order in which they appeared in the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloze {
    pub choices: IndexMap<String, Vec<String>>,
    #[serde(deserialize_with = "index::keyed")]
    pub answer: IndexMap<String, usize>,
}

/// `match`: each left-hand item picks one of its own right-hand options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    pub pairs: Vec<MatchPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    #[serde(rename = "rightOptions")]
    pub right_options: Vec<String>,
    #[serde(deserialize_with = "index::one")]
    pub answer: usize,
}

/// `order`: the answer lists choice indices in their correct order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub choices: Vec<String>,
    #[serde(deserialize_with = "index::many")]
    pub answer: Vec<usize>,
}

/// Answer indices accept any non-negative whole number, so `1.0` decodes as
/// `1` while `1.5` and `-1` are rejected.
mod index {
    use std::fmt;

    use indexmap::IndexMap;
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Deserialize;

    struct Index(usize);

    impl<'de> Deserialize<'de> for Index {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(IndexVisitor)
        }
    }

    struct IndexVisitor;

    impl<'de> Visitor<'de> for IndexVisitor {
        type Value = Index;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Index, E> {
            usize::try_from(v)
                .map(Index)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Index, E> {
            usize::try_from(v)
                .map(Index)
                .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Index, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
                Ok(Index(v as usize))
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    pub fn one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        Index::deserialize(deserializer).map(|i| i.0)
    }

    pub fn many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<usize>, D::Error> {
        let items = Vec::<Index>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|i| i.0).collect())
    }

    pub fn keyed<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, usize>, D::Error> {
        let items = IndexMap::<String, Index>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|(k, i)| (k, i.0)).collect())
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The `type` tag of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    McqSingle,
    McqMulti,
    Tf,
    Complete,
    Cloze,
    Match,
    Order,
}

impl QuestionType {
    pub const ALL: [QuestionType; 8] = [
        QuestionType::Mcq,
        QuestionType::McqSingle,
        QuestionType::McqMulti,
        QuestionType::Tf,
        QuestionType::Complete,
        QuestionType::Cloze,
        QuestionType::Match,
        QuestionType::Order,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::McqSingle => "mcq_single",
            QuestionType::McqMulti => "mcq_multi",
            QuestionType::Tf => "tf",
            QuestionType::Complete => "complete",
            QuestionType::Cloze => "cloze",
            QuestionType::Match => "match",
            QuestionType::Order => "order",
        }
    }

    /// Multiple-choice types whose `choices` may arrive as a keyed map.
    pub fn is_choice_family(&self) -> bool {
        matches!(
            self,
            QuestionType::Mcq | QuestionType::McqSingle | QuestionType::McqMulti
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown question type: {s}"))
    }
}
