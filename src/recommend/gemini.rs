//! Gemini adapter for recommendation text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_prompt, parse_recommendations, RecommendError, RecommendationProvider};
use crate::config::RecommenderConfig;
use crate::types::{Recommendation, ScoreRecord};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum error body echoed into `RecommendError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiRecommender {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiRecommender {
    /// Create from API key with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RecommendError> {
        Self::with_config(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }

    /// Create from loaded configuration; fails when no API key is set.
    pub fn from_config(config: &RecommenderConfig) -> Result<Self, RecommendError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RecommendError::config("GEMINI_API_KEY not set"))?;

        Self::with_config(api_key, &config.base_url, &config.model, config.timeout)
    }

    /// Create with custom configuration.
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RecommendError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RecommendError::config("API key is empty"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| RecommendError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    fn first_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
    }
}

// =============================================================================
// PROVIDER IMPL
// =============================================================================

#[async_trait]
impl RecommendationProvider for GeminiRecommender {
    async fn recommend(&self, scores: &ScoreRecord) -> Result<Vec<Recommendation>, RecommendError> {
        let prompt = build_prompt(scores)?;
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let mut message = text;
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(RecommendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        let content = parsed.first_text().ok_or(RecommendError::MissingContent)?;
        let recommendations = parse_recommendations(&content)?;

        debug!(
            model = %self.model,
            count = recommendations.len(),
            "received recommendations"
        );
        Ok(recommendations)
    }
}
