//! Core types for the lifestyle assessment
//!
//! This module defines the data that flows between the catalog, the scoring
//! engine and the assessment flow: raw answers, respondent metadata, score
//! records and recommendations.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Yes/no token recorded for binary questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

/// Raw answer captured from respondent input.
///
/// Sliders record the chosen value, choices record the zero-based option
/// index, yes/no questions record a token. On the wire this is a bare number
/// or the strings `"yes"` / `"no"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(YesNo),
    Number(f64),
}

impl Answer {
    pub fn yes() -> Self {
        Answer::Flag(YesNo::Yes)
    }

    pub fn no() -> Self {
        Answer::Flag(YesNo::No)
    }

    /// Answer selecting the option at `index`
    pub fn index(index: usize) -> Self {
        Answer::Number(index as f64)
    }

    /// Answer carrying a slider value
    pub fn value(value: f64) -> Self {
        Answer::Number(value)
    }

    /// Numeric value, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Option index, if this is a non-negative whole number
    pub fn as_index(&self) -> Option<usize> {
        let v = self.as_number()?;
        if v >= 0.0 && v.fract() == 0.0 {
            Some(v as usize)
        } else {
            None
        }
    }

    pub fn as_flag(&self) -> Option<YesNo> {
        match self {
            Answer::Flag(flag) => Some(*flag),
            Answer::Number(_) => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Flag(flag) => f.write_str(flag.as_str()),
            Answer::Number(v) => write!(f, "{v}"),
        }
    }
}

/// Answers keyed by question id.
///
/// Grows as the respondent progresses. Re-answering a question replaces the
/// previous value; nothing is ever removed except by a full restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, Answer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the answer to a question
    pub fn record(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.answers.insert(question_id.into(), answer);
    }

    /// Builder-style variant of [`AnswerSet::record`]
    pub fn with(mut self, question_id: impl Into<String>, answer: Answer) -> Self {
        self.record(question_id, answer);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(id, answer)| (id.as_str(), answer))
    }

    /// Drop every answer (full restart only)
    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

/// Respondent gender, used only to pick alternate question wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::NonBinary => "non_binary",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::NonBinary => "Non-binary",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// Per-session respondent identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RespondentId(String);

impl RespondentId {
    /// Generate a fresh identifier (`user_<uuid>`)
    pub fn generate() -> Self {
        Self(format!("user_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RespondentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RespondentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RespondentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Placeholder stored for optional location fields left blank
pub const NOT_PROVIDED: &str = "Not provided";

/// Metadata collected at consent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub age: u32,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl Respondent {
    /// Build respondent metadata, substituting the placeholder for blank location fields
    pub fn new(age: u32, city: Option<&str>, state: Option<&str>, gender: Option<Gender>) -> Self {
        Self {
            age,
            city: or_not_provided(city),
            state: or_not_provided(state),
            gender,
        }
    }
}

fn or_not_provided(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_PROVIDED.to_string(),
    }
}

/// Display tier of a normalized score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 7 and above
    Strong,
    /// 4 up to 7
    Fair,
    /// Below 4
    Low,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 7.0 {
            ScoreBand::Strong
        } else if score >= 4.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Fair => "fair",
            ScoreBand::Low => "low",
        }
    }
}

/// One category's normalized score
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub category_id: String,
    pub score: f64,
}

/// Normalized score per category, in catalog order.
///
/// Serializes as a JSON object whose keys keep catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreRecord {
    entries: Vec<CategoryScore>,
}

impl ScoreRecord {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, category_id: impl Into<String>, score: f64) {
        self.entries.push(CategoryScore {
            category_id: category_id.into(),
            score,
        });
    }

    pub fn get(&self, category_id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.category_id == category_id)
            .map(|e| e.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        self.entries.iter()
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arithmetic mean of all category scores (0 for an empty record)
    pub fn overall(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|e| e.score).sum();
        sum / self.entries.len() as f64
    }

    /// Display tier for a category, if present
    pub fn band(&self, category_id: &str) -> Option<ScoreBand> {
        self.get(category_id).map(ScoreBand::for_score)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for ScoreRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.category_id, &entry.score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoreRecordVisitor;

        impl<'de> Visitor<'de> for ScoreRecordVisitor {
            type Value = ScoreRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category id to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = ScoreRecord::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((category_id, score)) = access.next_entry::<String, f64>()? {
                    record.push(category_id, score);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(ScoreRecordVisitor)
    }
}

fn default_category() -> String {
    "general".to_string()
}

/// One action-plan item shown on the results view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default = "default_category")]
    pub category: String,
    pub title: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}
