//! Error types for Synheart Lifestyle

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::flow::FlowError;
use crate::history::HistoryError;

/// Errors surfaced by the library's public entry points
#[derive(Debug, Error)]
pub enum LifestyleError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}
