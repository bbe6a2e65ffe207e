//! Recommendation provider
//!
//! After submission the score record is sent to a text-generation service
//! that returns a short action plan. Any failure along the way (transport,
//! status, missing candidate, malformed JSON) is equivalent: the respondent
//! gets the fixed fallback list instead.

pub mod error;
pub mod gemini;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::types::{Recommendation, ScoreRecord};

pub use error::RecommendError;
pub use gemini::GeminiRecommender;

/// Number of tips requested from the provider
pub const TIP_COUNT: usize = 5;

/// Source of action-plan recommendations for a score record
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(&self, scores: &ScoreRecord) -> Result<Vec<Recommendation>, RecommendError>;
}

#[async_trait]
impl<T: RecommendationProvider + ?Sized> RecommendationProvider for Box<T> {
    async fn recommend(&self, scores: &ScoreRecord) -> Result<Vec<Recommendation>, RecommendError> {
        (**self).recommend(scores).await
    }
}

/// Provider used when no API key is configured; always answers with the fallback list
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRecommender;

#[async_trait]
impl RecommendationProvider for OfflineRecommender {
    async fn recommend(&self, _scores: &ScoreRecord) -> Result<Vec<Recommendation>, RecommendError> {
        debug!("no recommendation provider configured, using fallback list");
        Ok(fallback_recommendations())
    }
}

/// Fixed two-item action plan shown whenever the provider is unusable
pub fn fallback_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            category: "general".to_string(),
            title: "Start Small".to_string(),
            action: "Pick one healthy habit to focus on this week.".to_string(),
            why: Some("Small, consistent changes lead to lasting results.".to_string()),
        },
        Recommendation {
            category: "general".to_string(),
            title: "Track Progress".to_string(),
            action: "Retake this assessment in 4 weeks.".to_string(),
            why: Some("Monitoring helps maintain motivation.".to_string()),
        },
    ]
}

/// Ask `provider` for recommendations, substituting the fallback list on any error
pub async fn recommend_or_fallback<P>(provider: &P, scores: &ScoreRecord) -> Vec<Recommendation>
where
    P: RecommendationProvider + ?Sized,
{
    match provider.recommend(scores).await {
        Ok(recommendations) => recommendations,
        Err(e) => {
            warn!(error = %e, code = e.code(), "recommendation fetch failed, using fallback");
            fallback_recommendations()
        }
    }
}

/// Natural-language prompt embedding the serialized score record
pub fn build_prompt(scores: &ScoreRecord) -> Result<String, serde_json::Error> {
    Ok(format!(
        "Provide {TIP_COUNT} short wellness tips for these wellness scores: {}. \
         Return ONLY a JSON array: [{{\"category\": \"string\", \"title\": \"string\", \
         \"action\": \"string\", \"why\": \"string\"}}]",
        scores.to_json()?
    ))
}

/// Strip a surrounding markdown code fence (```` ``` ```` or ```` ```json ````).
///
/// Text without a fence is returned trimmed and otherwise untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) up to the end of the opening line
    let body = match rest.find('\n') {
        Some(newline) => {
            let info = rest[..newline].trim();
            if info.chars().all(|c| c.is_ascii_alphanumeric()) {
                &rest[newline + 1..]
            } else {
                rest
            }
        }
        None => rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse provider text into recommendations
pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>, RecommendError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}
