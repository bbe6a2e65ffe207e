//! Synheart Lifestyle - Lifestyle medicine self-assessment engine
//!
//! Lifestyle walks a respondent through a fixed questionnaire covering six
//! pillars of lifestyle medicine and turns the answers into per-category
//! scores on a 0-10 scale: consent → category pages → scoring → action plan.
//!
//! ## Modules
//!
//! - **Catalog**: The immutable question and point tables
//! - **Scoring**: Pure answers → scores computation
//! - **Flow**: Reducer over the assessment steps, emitting effects
//! - **Session**: Runs reducer effects against the recommender, sink, and history

pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod gating;
pub mod history;
pub mod recommend;
pub mod scoring;
pub mod session;
pub mod sink;
pub mod types;

#[cfg(feature = "cli")]
pub mod telemetry;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use catalog::Catalog;
pub use error::LifestyleError;
pub use flow::{reduce, AssessmentState, Effect, Event, FlowError, Step, Transition};
pub use scoring::{compute_scores, scores_from_json, ScoringEngine};
pub use session::AssessmentSession;

pub use types::{Answer, AnswerSet, Gender, Recommendation, Respondent, RespondentId, ScoreRecord};

/// Lifestyle version reported by the CLI and FFI
pub const LIFESTYLE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "synheart-lifestyle";
