//! Scoring engine
//!
//! Turns an [`AnswerSet`] into a [`ScoreRecord`]. For every category the engine
//! sums one integer per applicable, answered question (looked up from that
//! question's point table) and rescales the total against the category's
//! `max_attainable_points`:
//!
//! `score = total / max_attainable_points * 10`
//!
//! The result is not clamped. Dependent questions are bonuses outside the
//! declared maximum, so a category may legitimately score above 10.

use tracing::debug;

use crate::catalog::{Catalog, CategorySpec, QuestionSpec};
use crate::error::LifestyleError;
use crate::gating::is_applicable;
use crate::types::{Answer, AnswerSet, ScoreRecord};

/// Scale every category is normalized to
pub const SCORE_SCALE: f64 = 10.0;

/// Score processor bound to a catalog
pub struct ScoringEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Compute one normalized score per category, in catalog order.
    ///
    /// Never fails: unanswered and exempt questions contribute nothing, and an
    /// answer whose lookup does not resolve contributes zero.
    pub fn compute(&self, answers: &AnswerSet) -> ScoreRecord {
        let mut record = ScoreRecord::with_capacity(self.catalog.len());
        for category in self.catalog.categories() {
            record.push(category.id.as_str(), category_score(category, answers));
        }
        record
    }

    /// Raw point total of a single category
    pub fn category_points(&self, category: &CategorySpec, answers: &AnswerSet) -> u32 {
        category_points(category, answers)
    }
}

/// Compute scores against a catalog
pub fn compute_scores(catalog: &Catalog, answers: &AnswerSet) -> ScoreRecord {
    ScoringEngine::new(catalog).compute(answers)
}

/// Score an answers JSON object and return the score record as JSON
pub fn scores_from_json(catalog: &Catalog, answers_json: &str) -> Result<String, LifestyleError> {
    let answers: AnswerSet = serde_json::from_str(answers_json)?;
    Ok(compute_scores(catalog, &answers).to_json()?)
}

fn category_score(category: &CategorySpec, answers: &AnswerSet) -> f64 {
    let total = category_points(category, answers);
    total as f64 / category.max_attainable_points as f64 * SCORE_SCALE
}

fn category_points(category: &CategorySpec, answers: &AnswerSet) -> u32 {
    category
        .questions
        .iter()
        .filter(|q| is_applicable(q, answers))
        .filter_map(|q| answers.get(&q.id).map(|answer| question_points(q, answer)))
        .sum()
}

/// Points for one answered question; unresolvable lookups yield zero
fn question_points(question: &QuestionSpec, answer: &Answer) -> u32 {
    let points = if question.accepts(answer) {
        question.points_for(answer)
    } else {
        None
    };

    match points {
        Some(points) => points,
        None => {
            debug!(
                question = %question.id,
                kind = question.kind.type_name(),
                answer = %answer,
                "answer does not resolve in point table, counting zero"
            );
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{QuestionKind, SliderScoring};
    use crate::types::Gender;
    use pretty_assertions::assert_eq;

    /// Answer that maximizes a question's table lookup
    fn best_answer(question: &QuestionSpec) -> Answer {
        match &question.kind {
            QuestionKind::Choice { scores, .. } => {
                let best = scores.iter().copied().max().unwrap_or(0);
                Answer::index(scores.iter().position(|s| *s == best).unwrap())
            }
            QuestionKind::YesNo { yes, no } => {
                if yes >= no {
                    Answer::yes()
                } else {
                    Answer::no()
                }
            }
            QuestionKind::Slider { min, scoring, .. } => match scoring {
                SliderScoring::Optimal { band, .. } => Answer::value(band.min),
                SliderScoring::Steps { steps } => {
                    let best = scoring.best_points();
                    let step = steps.iter().find(|s| s.points == best).unwrap();
                    Answer::value(step.up_to.max(*min))
                }
            },
        }
    }

    fn best_non_dependent_answers(catalog: &Catalog) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for q in catalog.questions().filter(|q| !q.is_dependent()) {
            answers.record(q.id.as_str(), best_answer(q));
        }
        answers
    }

    #[test]
    fn test_empty_answers_score_zero_in_catalog_order() {
        let catalog = Catalog::builtin();
        let record = compute_scores(catalog, &AnswerSet::new());

        let ids: Vec<&str> = record.category_ids().collect();
        let expected: Vec<&str> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, expected);
        assert!(record.iter().all(|e| e.score == 0.0));
    }

    #[test]
    fn test_best_answers_score_ten_everywhere() {
        let catalog = Catalog::builtin();
        let record = compute_scores(catalog, &best_non_dependent_answers(catalog));

        for entry in record.iter() {
            assert!(
                (entry.score - 10.0).abs() < 1e-9,
                "{} scored {}",
                entry.category_id,
                entry.score
            );
        }
    }

    #[test]
    fn test_sleep_all_max_is_ten() {
        let answers = AnswerSet::new()
            .with("sleep_consistency", Answer::index(4))
            .with("sleep_quality", Answer::index(4))
            .with("screen_before_bed", Answer::index(4));

        let record = compute_scores(Catalog::builtin(), &answers);
        assert_eq!(record.get("sleep"), Some(10.0));
    }

    #[test]
    fn test_partial_sleep_answers() {
        let answers = AnswerSet::new()
            .with("sleep_consistency", Answer::index(2))
            .with("sleep_quality", Answer::index(4));

        let record = compute_scores(Catalog::builtin(), &answers);
        assert_eq!(record.get("sleep"), Some(6.0 / 12.0 * 10.0));
    }

    #[test]
    fn test_stale_dependent_answer_is_ignored() {
        let catalog = Catalog::builtin();
        let answers = AnswerSet::new()
            .with("strength_training", Answer::no())
            .with("strength_days", Answer::value(7.0));

        assert_eq!(compute_scores(catalog, &answers).get("physical_activity"), Some(0.0));
    }

    #[test]
    fn test_dependent_bonus_is_not_clamped() {
        let catalog = Catalog::builtin();
        let answers = best_non_dependent_answers(catalog).with("strength_days", Answer::value(7.0));

        let score = compute_scores(catalog, &answers).get("physical_activity").unwrap();
        assert!((score - 17.0 / 16.0 * 10.0).abs() < 1e-9);
        assert!(score > 10.0);
    }

    #[test]
    fn test_malformed_answers_contribute_zero() {
        let catalog = Catalog::builtin();
        let answers = AnswerSet::new()
            .with("sleep_quality", Answer::index(7))
            .with("sleep_consistency", Answer::yes())
            .with("screen_before_bed", Answer::value(1.5))
            .with("fruits", Answer::value(42.0))
            .with("strength_training", Answer::index(0));

        let record = compute_scores(catalog, &answers);
        assert_eq!(record.get("sleep"), Some(0.0));
        assert_eq!(record.get("nutrition"), Some(0.0));
        assert_eq!(record.get("physical_activity"), Some(0.0));
    }

    #[test]
    fn test_scoring_is_gender_independent() {
        let catalog = Catalog::builtin();
        let iron = catalog.question("iron_rich_foods").unwrap();
        assert_ne!(iron.prompt_for(Some(Gender::Female)), iron.prompt_for(None));

        // Scoring takes no respondent at all, so equal answers give equal scores
        let answers = AnswerSet::new().with("iron_rich_foods", Answer::index(3));
        assert_eq!(compute_scores(catalog, &answers), compute_scores(catalog, &answers));
        assert_eq!(compute_scores(catalog, &answers).get("nutrition"), Some(3.0 / 20.0 * 10.0));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let catalog = Catalog::builtin();
        let answers = best_non_dependent_answers(catalog).with("fruits", Answer::value(5.0));

        let first = compute_scores(catalog, &answers);
        let second = compute_scores(catalog, &answers);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_scores_from_json() {
        let json = scores_from_json(
            Catalog::builtin(),
            r#"{"strength_training": "yes", "strength_days": 7, "sleep_quality": 2}"#,
        )
        .unwrap();
        assert!(json.starts_with(r#"{"sleep":"#));

        let err = scores_from_json(Catalog::builtin(), "[1, 2]").unwrap_err();
        assert!(matches!(err, LifestyleError::JsonError(_)));
    }

    #[test]
    fn test_category_points() {
        let catalog = Catalog::builtin();
        let engine = ScoringEngine::new(catalog);
        let answers = AnswerSet::new()
            .with("daily_screen_time", Answer::value(3.0))
            .with("social_media", Answer::value(0.5))
            .with("screen_breaks", Answer::index(1));

        let screen = catalog.category("screen_time").unwrap();
        assert_eq!(engine.category_points(screen, &answers), 3 + 3 + 1);
    }
}
