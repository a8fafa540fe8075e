//! quizgate-core — Validation and grounding scoring for generated quiz questions.
//!
//! This crate defines the question data model and the pipeline that turns a
//! batch of untrusted, model-generated candidates into accepted questions with
//! a quality score, plus a warning trail for everything that was rejected.

pub mod audit;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod extract;
pub mod grounding;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod report;
pub mod request;
pub mod validate;

pub use engine::{BatchOutcome, EngineConfig, QuizGate};
pub use error::{RequestError, SchemaError};
pub use model::{Question, QuestionBody, QuestionType};
