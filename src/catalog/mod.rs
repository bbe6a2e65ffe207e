//! Question catalog
//!
//! The catalog is an immutable, ordered set of categories. It is validated once
//! when built: ids must be unique, dependencies must point at an earlier
//! question, point tables must line up with their options, and every
//! category's declared `max_attainable_points` must match the value derived
//! from its own point tables.

pub mod builtin;
pub mod question;

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;
use thiserror::Error;

use crate::error::LifestyleError;

pub use question::{
    Band, CategorySpec, Dependency, GenderVariant, QuestionKind, QuestionSpec, SliderScoring, Step,
};

/// Problems found while loading a catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Catalog has no categories")]
    Empty,

    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("Category {category} has no questions")]
    EmptyCategory { category: String },

    #[error("Question {question} is listed under {listed} but declares category {declared}")]
    CategoryMismatch {
        question: String,
        listed: String,
        declared: String,
    },

    #[error("Question {question} depends on {target}, which is not an earlier question")]
    DanglingDependency { question: String, target: String },

    #[error("Question {question} has {options} options but {scores} scores")]
    ScoreTableMismatch {
        question: String,
        options: usize,
        scores: usize,
    },

    #[error("Question {question} has an invalid slider definition: {reason}")]
    InvalidSlider { question: String, reason: String },

    #[error("Category {category} must have a positive max_attainable_points")]
    ZeroMaxPoints { category: String },

    #[error("Category {category} declares max {declared} points but its questions yield {derived}")]
    MaxPointsDrift {
        category: String,
        declared: u32,
        derived: u32,
    },
}

/// Validated, ordered set of categories
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    categories: Vec<CategorySpec>,
    #[serde(skip)]
    question_index: HashMap<String, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog, validating its structure and point tables
    pub fn new(categories: Vec<CategorySpec>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut question_index: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen_categories: Vec<&str> = Vec::with_capacity(categories.len());

        for (ci, category) in categories.iter().enumerate() {
            if seen_categories.contains(&category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
            seen_categories.push(&category.id);

            if category.questions.is_empty() {
                return Err(CatalogError::EmptyCategory {
                    category: category.id.clone(),
                });
            }

            for (qi, question) in category.questions.iter().enumerate() {
                if question.category_id != category.id {
                    return Err(CatalogError::CategoryMismatch {
                        question: question.id.clone(),
                        listed: category.id.clone(),
                        declared: question.category_id.clone(),
                    });
                }

                // Dependencies may only look backwards, so the index built so far is enough
                if let Some(dep) = &question.depends_on {
                    if !question_index.contains_key(&dep.question_id) {
                        return Err(CatalogError::DanglingDependency {
                            question: question.id.clone(),
                            target: dep.question_id.clone(),
                        });
                    }
                }

                validate_kind(question)?;

                if question_index
                    .insert(question.id.clone(), (ci, qi))
                    .is_some()
                {
                    return Err(CatalogError::DuplicateQuestion(question.id.clone()));
                }
            }

            if category.max_attainable_points == 0 {
                return Err(CatalogError::ZeroMaxPoints {
                    category: category.id.clone(),
                });
            }

            let derived = category.derived_max_points();
            if derived != category.max_attainable_points {
                return Err(CatalogError::MaxPointsDrift {
                    category: category.id.clone(),
                    declared: category.max_attainable_points,
                    derived,
                });
            }
        }

        Ok(Self {
            categories,
            question_index,
        })
    }

    /// The process-wide built-in catalog
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in tables fail [`Catalog::new`] validation,
    /// which only a broken build can cause.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            // Built-in tables are validated by the catalog tests
            Catalog::new(builtin::categories()).unwrap_or_else(|e| panic!("built-in catalog: {e}"))
        })
    }

    pub fn categories(&self) -> &[CategorySpec] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, category_id: &str) -> Result<&CategorySpec, LifestyleError> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| LifestyleError::UnknownCategory(category_id.to_string()))
    }

    pub fn category_at(&self, index: usize) -> Option<&CategorySpec> {
        self.categories.get(index)
    }

    pub fn category_index(&self, category_id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == category_id)
    }

    /// Ordered question list of a category
    pub fn questions_in(&self, category_id: &str) -> Result<&[QuestionSpec], LifestyleError> {
        Ok(&self.category(category_id)?.questions)
    }

    pub fn question(&self, question_id: &str) -> Result<&QuestionSpec, LifestyleError> {
        self.question_index
            .get(question_id)
            .map(|&(ci, qi)| &self.categories[ci].questions[qi])
            .ok_or_else(|| LifestyleError::UnknownQuestion(question_id.to_string()))
    }

    /// Category that owns a question
    pub fn category_of(&self, question_id: &str) -> Result<&CategorySpec, LifestyleError> {
        self.question_index
            .get(question_id)
            .map(|&(ci, _)| &self.categories[ci])
            .ok_or_else(|| LifestyleError::UnknownQuestion(question_id.to_string()))
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.categories.iter().flat_map(|c| c.questions.iter())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn validate_kind(question: &QuestionSpec) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidSlider {
        question: question.id.clone(),
        reason: reason.to_string(),
    };

    match &question.kind {
        QuestionKind::Choice { options, scores } => {
            if options.is_empty() || options.len() != scores.len() {
                return Err(CatalogError::ScoreTableMismatch {
                    question: question.id.clone(),
                    options: options.len(),
                    scores: scores.len(),
                });
            }
        }
        QuestionKind::Slider {
            min, max, scoring, ..
        } => {
            if !(min.is_finite() && max.is_finite()) || min >= max {
                return Err(invalid("range must satisfy min < max"));
            }
            match scoring {
                SliderScoring::Optimal {
                    band, tolerance, ..
                } => {
                    if band.min > band.max || band.min < *min || band.max > *max {
                        return Err(invalid("optimal band must lie inside the slider range"));
                    }
                    if *tolerance < 0.0 {
                        return Err(invalid("tolerance must not be negative"));
                    }
                }
                SliderScoring::Steps { steps } => {
                    if steps.is_empty() {
                        return Err(invalid("step table is empty"));
                    }
                    if steps.windows(2).any(|w| w[0].up_to >= w[1].up_to) {
                        return Err(invalid("step bounds must be strictly ascending"));
                    }
                    if steps.last().map(|s| s.up_to < *max).unwrap_or(true) {
                        return Err(invalid("step table must cover the slider maximum"));
                    }
                }
            }
        }
        QuestionKind::YesNo { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Answer;
    use pretty_assertions::assert_eq;

    fn sleep_category(max: u32) -> CategorySpec {
        CategorySpec::new(
            "sleep",
            "Sleep",
            max,
            vec![
                QuestionSpec::new(
                    "sleep_quality",
                    "sleep",
                    "How would you rate your overall sleep quality?",
                    QuestionKind::linear_choice(&["Very poor", "Poor", "Fair", "Good", "Excellent"], false),
                ),
                QuestionSpec::new(
                    "naps",
                    "sleep",
                    "Do you nap during the day?",
                    QuestionKind::yes_no(0, 2),
                ),
            ],
        )
    }

    #[test]
    fn test_builtin_tables_validate() {
        let catalog = Catalog::new(builtin::categories()).unwrap();
        assert_eq!(catalog.categories(), Catalog::builtin().categories());
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        let ids: Vec<&str> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "sleep",
                "nutrition",
                "physical_activity",
                "stress_management",
                "social_connections",
                "screen_time",
            ]
        );
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::new(vec![sleep_category(6)]).unwrap();

        assert_eq!(catalog.question("naps").unwrap().category_id, "sleep");
        assert_eq!(catalog.category_of("naps").unwrap().id, "sleep");
        assert_eq!(catalog.questions_in("sleep").unwrap().len(), 2);
        assert_eq!(catalog.category_index("sleep"), Some(0));

        assert!(matches!(
            catalog.question("nope"),
            Err(LifestyleError::UnknownQuestion(id)) if id == "nope"
        ));
        assert!(matches!(
            catalog.category("nope"),
            Err(LifestyleError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_max_points_drift_is_rejected() {
        let err = Catalog::new(vec![sleep_category(12)]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::MaxPointsDrift {
                category: "sleep".to_string(),
                declared: 12,
                derived: 6,
            }
        );
    }

    #[test]
    fn test_duplicate_question_is_rejected() {
        let mut category = sleep_category(10);
        category.questions.push(category.questions[0].clone());
        let err = Catalog::new(vec![category]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateQuestion("sleep_quality".to_string()));
    }

    #[test]
    fn test_forward_dependency_is_rejected() {
        let mut category = sleep_category(6);
        category.questions[0] = category.questions[0]
            .clone()
            .depends_on("naps", Answer::yes());
        category.max_attainable_points = 2;

        let err = Catalog::new(vec![category]).unwrap_err();
        assert!(matches!(err, CatalogError::DanglingDependency { .. }));
    }

    #[test]
    fn test_score_table_mismatch_is_rejected() {
        let category = CategorySpec::new(
            "c",
            "C",
            1,
            vec![QuestionSpec::new("q", "c", "?", QuestionKind::choice(&["a", "b"], &[1]))],
        );
        assert!(matches!(
            Catalog::new(vec![category]),
            Err(CatalogError::ScoreTableMismatch { options: 2, scores: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_slider_is_rejected() {
        let band_outside = CategorySpec::new(
            "c",
            "C",
            3,
            vec![QuestionSpec::new(
                "q",
                "c",
                "?",
                QuestionKind::optimal_slider(0.0, 5.0, "hours", Band::new(4.0, 6.0), 3, 1.0, 1),
            )],
        );
        assert!(matches!(
            Catalog::new(vec![band_outside]),
            Err(CatalogError::InvalidSlider { .. })
        ));

        let short_steps = CategorySpec::new(
            "c",
            "C",
            2,
            vec![QuestionSpec::new(
                "q",
                "c",
                "?",
                QuestionKind::stepped_slider(0.0, 10.0, "hours", &[Step::new(2.0, 2), Step::new(6.0, 1)]),
            )],
        );
        assert!(matches!(
            Catalog::new(vec![short_steps]),
            Err(CatalogError::InvalidSlider { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert_eq!(Catalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_catalog_serializes_categories_in_order() {
        let catalog = Catalog::new(vec![sleep_category(6)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();

        assert_eq!(value["categories"][0]["id"], "sleep");
        assert_eq!(value["categories"][0]["questions"][1]["kind"]["type"], "yes_no");
        assert!(value.get("question_index").is_none());
    }
}
