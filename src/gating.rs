//! Navigation gating
//!
//! Pure predicates over a category and the current answers. They are cheap and
//! are re-evaluated after every answer change, since changing a governing
//! question can flip a dependent question between exempt and required.

use crate::catalog::{Catalog, QuestionSpec};
use crate::error::LifestyleError;
use crate::types::AnswerSet;

/// Whether a question currently applies to the respondent.
///
/// A question without a dependency always applies. A dependent question
/// applies only while its governing question's recorded answer equals the
/// required trigger value.
pub fn is_applicable(question: &QuestionSpec, answers: &AnswerSet) -> bool {
    match &question.depends_on {
        None => true,
        Some(dep) => answers.get(&dep.question_id) == Some(&dep.required),
    }
}

/// Whether a question has a recorded answer that its kind accepts
pub fn is_answered(question: &QuestionSpec, answers: &AnswerSet) -> bool {
    answers
        .get(&question.id)
        .map(|answer| question.accepts(answer))
        .unwrap_or(false)
}

/// Ids of the applicable questions in a category that still lack a valid answer
pub fn missing_questions(
    catalog: &Catalog,
    category_id: &str,
    answers: &AnswerSet,
) -> Result<Vec<String>, LifestyleError> {
    let missing = catalog
        .questions_in(category_id)?
        .iter()
        .filter(|q| is_applicable(q, answers) && !is_answered(q, answers))
        .map(|q| q.id.clone())
        .collect();
    Ok(missing)
}

/// Whether the respondent may advance past a category
pub fn is_category_complete(
    catalog: &Catalog,
    category_id: &str,
    answers: &AnswerSet,
) -> Result<bool, LifestyleError> {
    Ok(missing_questions(catalog, category_id, answers)?.is_empty())
}

/// Questions of a category to display, in order, skipping exempt ones
pub fn visible_questions<'a>(
    catalog: &'a Catalog,
    category_id: &str,
    answers: &AnswerSet,
) -> Result<Vec<&'a QuestionSpec>, LifestyleError> {
    Ok(catalog
        .questions_in(category_id)?
        .iter()
        .filter(|q| is_applicable(q, answers))
        .collect())
}
