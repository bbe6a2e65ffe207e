//! Logging sink
//!
//! Flat records posted to a spreadsheet-style endpoint after each submission
//! and after a feedback rating. Delivery is best-effort: failures are reported
//! to the caller, which logs and drops them. Nothing is retried.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::SinkConfig;
use crate::types::{Respondent, ScoreRecord};

/// Timestamp layout used on every record, e.g. `3/7/2026, 9:05:00 PM`
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink returned HTTP {0}")]
    Status(u16),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Row logged once per submission.
///
/// Serializes as a flat object with fields in this order: `Timestamp`, `Age`,
/// `City`, `State`, `Gender` (only when known), one `"<Label> Score"` per
/// category, `Overall Score`, and an empty `Feedback Rating`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub timestamp: String,
    pub age: u32,
    pub city: String,
    pub state: String,
    pub gender: Option<String>,
    /// `(field name, score formatted to one decimal)` in catalog order
    pub category_scores: Vec<(String, String)>,
    pub overall_score: String,
}

impl SubmissionRecord {
    pub fn new(
        catalog: &Catalog,
        respondent: &Respondent,
        scores: &ScoreRecord,
        at: NaiveDateTime,
    ) -> Self {
        let category_scores = scores
            .iter()
            .map(|entry| {
                let label = catalog
                    .category(&entry.category_id)
                    .map(|c| c.label.clone())
                    .unwrap_or_else(|_| entry.category_id.clone());
                (format!("{label} Score"), format!("{:.1}", entry.score))
            })
            .collect();

        Self {
            timestamp: format_timestamp(at),
            age: respondent.age,
            city: respondent.city.clone(),
            state: respondent.state.clone(),
            gender: respondent.gender.map(|g| g.label().to_string()),
            category_scores,
            overall_score: format!("{:.1}", scores.overall()),
        }
    }
}

impl Serialize for SubmissionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Timestamp", &self.timestamp)?;
        map.serialize_entry("Age", &self.age)?;
        map.serialize_entry("City", &self.city)?;
        map.serialize_entry("State", &self.state)?;
        if let Some(gender) = &self.gender {
            map.serialize_entry("Gender", gender)?;
        }
        for (field, score) in &self.category_scores {
            map.serialize_entry(field, score)?;
        }
        map.serialize_entry("Overall Score", &self.overall_score)?;
        map.serialize_entry("Feedback Rating", "")?;
        map.end()
    }
}

/// Standalone row logged when the respondent rates the experience
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Type")]
    pub record_type: &'static str,
    #[serde(rename = "Feedback Rating")]
    pub rating: u8,
}

impl FeedbackRecord {
    pub fn new(rating: u8, at: NaiveDateTime) -> Self {
        Self {
            timestamp: format_timestamp(at),
            record_type: "Feedback",
            rating,
        }
    }
}

/// Destination for submission and feedback rows
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, record: &SubmissionRecord) -> Result<(), SinkError>;

    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), SinkError>;
}

#[async_trait]
impl<T: SubmissionSink + ?Sized> SubmissionSink for Box<T> {
    async fn submit(&self, record: &SubmissionRecord) -> Result<(), SinkError> {
        (**self).submit(record).await
    }

    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), SinkError> {
        (**self).feedback(record).await
    }
}

/// Sink that posts JSON rows to a spreadsheet endpoint
#[derive(Debug, Clone)]
pub struct SheetSink {
    client: reqwest::Client,
    url: String,
}

impl SheetSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| SinkError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Build from configuration; `None` when no sink URL is configured
    pub fn from_config(config: &SinkConfig) -> Result<Option<Self>, SinkError> {
        config
            .url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.timeout))
            .transpose()
    }

    async fn post<T: Serialize + Sync>(&self, body: &T) -> Result<(), SinkError> {
        let response = self.client.post(&self.url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionSink for SheetSink {
    async fn submit(&self, record: &SubmissionRecord) -> Result<(), SinkError> {
        self.post(record).await
    }

    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), SinkError> {
        self.post(record).await
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl SubmissionSink for NoopSink {
    async fn submit(&self, _record: &SubmissionRecord) -> Result<(), SinkError> {
        Ok(())
    }

    async fn feedback(&self, _record: &FeedbackRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that keeps rows in memory, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: Mutex<Vec<SubmissionRecord>>,
    feedback: Mutex<Vec<FeedbackRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submissions
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    pub fn feedback_records(&self) -> Vec<FeedbackRecord> {
        self.feedback
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn submit(&self, record: &SubmissionRecord) -> Result<(), SinkError> {
        if let Ok(mut rows) = self.submissions.lock() {
            rows.push(record.clone());
        }
        Ok(())
    }

    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), SinkError> {
        if let Ok(mut rows) = self.feedback.lock() {
            rows.push(record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn evening() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(21, 5, 0)
            .unwrap()
    }

    fn scores() -> ScoreRecord {
        let mut scores = ScoreRecord::default();
        scores.push("sleep", 10.0);
        scores.push("nutrition", 6.5);
        scores.push("screen_time", 0.0);
        scores
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(evening()), "3/7/2026, 9:05:00 PM");
    }

    #[test]
    fn test_submission_record_field_order() {
        let respondent = Respondent::new(15, Some("Denver"), None, None);
        let record = SubmissionRecord::new(Catalog::builtin(), &respondent, &scores(), evening());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"Timestamp":"3/7/2026, 9:05:00 PM","Age":15,"City":"Denver","#,
                r#""State":"Not provided","Sleep Score":"10.0","Nutrition Score":"6.5","#,
                r#""Screen Time Score":"0.0","Overall Score":"5.5","Feedback Rating":""}"#
            )
        );
    }

    #[test]
    fn test_submission_record_includes_known_gender() {
        let respondent = Respondent::new(17, None, None, Some(Gender::NonBinary));
        let record = SubmissionRecord::new(Catalog::builtin(), &respondent, &scores(), evening());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Gender"], "Non-binary");
    }

    #[test]
    fn test_feedback_record_shape() {
        let record = FeedbackRecord::new(9, evening());
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "Timestamp": "3/7/2026, 9:05:00 PM",
                "Type": "Feedback",
                "Feedback Rating": 9
            })
        );
    }

    #[tokio::test]
    async fn test_memory_sink_collects_rows() {
        let sink = MemorySink::new();
        sink.feedback(&FeedbackRecord::new(4, evening())).await.unwrap();

        assert_eq!(sink.feedback_records().len(), 1);
        assert!(sink.submissions().is_empty());
    }
}
