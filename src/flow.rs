//! Assessment flow
//!
//! The whole questionnaire is an explicit [`AssessmentState`] advanced by a
//! single pure function, [`reduce`]. Every user action is an [`Event`]; a
//! successful reduction yields the next state plus the side effects the host
//! should run (logging, fetching recommendations, rating feedback). Nothing in
//! this module performs I/O.
//!
//! Steps run `Consent → Category(0) → … → Category(n-1) → Results`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::catalog::{Catalog, CategorySpec};
use crate::gating::missing_questions;
use crate::scoring::compute_scores;
use crate::types::{Answer, AnswerSet, Gender, Recommendation, Respondent, RespondentId, ScoreRecord};

/// Youngest respondent allowed to take the assessment
pub const MIN_AGE: u32 = 13;

/// Upper bound accepted on the age field
pub const MAX_AGE: u32 = 120;

/// Lowest feedback rating
pub const MIN_RATING: u8 = 1;

/// Highest feedback rating
pub const MAX_RATING: u8 = 10;

/// Consent screen input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentForm {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// The "I am 13 or older" confirmation box
    #[serde(default)]
    pub age_confirmed: bool,
}

impl ConsentForm {
    /// Check the form and turn it into respondent metadata
    pub fn validate(&self) -> Result<Respondent, ConsentError> {
        let age = match self.age {
            Some(age) if age >= MIN_AGE => age,
            _ => return Err(ConsentError::AgeBelowMinimum),
        };
        if age > MAX_AGE {
            return Err(ConsentError::AgeAboveMaximum);
        }
        if !self.age_confirmed {
            return Err(ConsentError::NotConfirmed);
        }

        Ok(Respondent::new(
            age,
            self.city.as_deref(),
            self.state.as_deref(),
            self.gender,
        ))
    }
}

/// Blocking consent validation messages, shown to the respondent as-is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    #[error("Please enter a valid age (13 or older).")]
    AgeBelowMinimum,

    #[error("Please enter a valid age (120 or younger).")]
    AgeAboveMaximum,

    #[error("Please confirm you are 13 or older to continue.")]
    NotConfirmed,
}

/// Position in the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Step {
    Consent,
    /// Index into the catalog's categories
    Category(usize),
    Results,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Consent => f.write_str("consent"),
            Step::Category(index) => write!(f, "category {index}"),
            Step::Results => f.write_str("results"),
        }
    }
}

/// Everything the questionnaire knows about one respondent's run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    pub respondent_id: RespondentId,
    pub step: Step,
    #[serde(default)]
    pub respondent: Option<Respondent>,
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(default)]
    pub scores: Option<ScoreRecord>,
    #[serde(default)]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl AssessmentState {
    /// Fresh state at the consent step
    pub fn new(respondent_id: RespondentId) -> Self {
        Self {
            respondent_id,
            step: Step::Consent,
            respondent: None,
            answers: AnswerSet::new(),
            scores: None,
            recommendations: None,
            rating: None,
        }
    }

    /// Fresh state with a newly generated respondent id
    pub fn start() -> Self {
        Self::new(RespondentId::generate())
    }

    /// Category shown at the current step, if any
    pub fn current_category<'a>(&self, catalog: &'a Catalog) -> Option<&'a CategorySpec> {
        match self.step {
            Step::Category(index) => catalog.category_at(index),
            _ => None,
        }
    }

    /// Progress bar value in percent
    pub fn progress(&self, catalog: &Catalog) -> f64 {
        match self.step {
            Step::Consent => 0.0,
            Step::Results => 100.0,
            Step::Category(index) => {
                if catalog.is_empty() {
                    0.0
                } else {
                    (index + 1) as f64 / catalog.len() as f64 * 100.0
                }
            }
        }
    }

    /// Whether recommendations are still pending on the results view
    pub fn awaiting_recommendations(&self) -> bool {
        self.step == Step::Results && self.recommendations.is_none()
    }
}

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Consent(ConsentForm),
    Answer { question_id: String, answer: Answer },
    Next,
    Back,
    RecommendationsReady { recommendations: Vec<Recommendation> },
    Rate { rating: u8 },
    Restart,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Consent(_) => "consent",
            Event::Answer { .. } => "answer",
            Event::Next => "next",
            Event::Back => "back",
            Event::RecommendationsReady { .. } => "recommendations_ready",
            Event::Rate { .. } => "rate",
            Event::Restart => "restart",
        }
    }
}

/// Side effect requested by a transition; the host runs it at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Post the submission record to the logging sink
    LogSubmission {
        respondent: Respondent,
        scores: ScoreRecord,
    },
    /// Ask the recommendation provider for tips, answering with `RecommendationsReady`
    FetchRecommendations { scores: ScoreRecord },
    /// Append the submission to local history
    RecordHistory { scores: ScoreRecord },
    /// Post the standalone feedback record
    LogFeedback { rating: u8 },
}

/// Result of a successful reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: AssessmentState,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: AssessmentState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Reasons an event is refused; the previous state stays valid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("{0}")]
    Consent(#[from] ConsentError),

    #[error("Event {event} is not accepted at step {step}")]
    NotAccepting { event: &'static str, step: Step },

    #[error("Step {0} does not exist in this catalog")]
    UnknownStep(Step),

    #[error("Assessment has no consented respondent")]
    MissingRespondent,

    #[error("Category {category} is incomplete, unanswered: {}", .missing.join(", "))]
    Incomplete {
        category: String,
        missing: Vec<String>,
    },

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question {question} is not part of the current category {category}")]
    OutOfStep { question: String, category: String },

    #[error("Answer {answer} is not valid for question {question}")]
    InvalidAnswer { question: String, answer: String },

    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    #[error("This submission has already been rated")]
    AlreadyRated,
}

/// Advance the assessment by one event.
///
/// Pure: the input state is never modified, and a refused event leaves the
/// caller holding the previous state.
pub fn reduce(
    catalog: &Catalog,
    state: &AssessmentState,
    event: Event,
) -> Result<Transition, FlowError> {
    let mut next = state.clone();

    match (state.step, event) {
        (_, Event::Restart) => Ok(Transition::quiet(AssessmentState::new(
            state.respondent_id.clone(),
        ))),

        (Step::Consent, Event::Consent(form)) => {
            next.respondent = Some(form.validate()?);
            next.step = Step::Category(0);
            Ok(Transition::quiet(next))
        }

        (Step::Category(index), Event::Answer { question_id, answer }) => {
            let category = category_at(catalog, state.step, index)?;
            let question = catalog
                .question(&question_id)
                .map_err(|_| FlowError::UnknownQuestion(question_id.clone()))?;
            if question.category_id != category.id {
                return Err(FlowError::OutOfStep {
                    question: question_id,
                    category: category.id.clone(),
                });
            }
            if !question.accepts(&answer) {
                return Err(FlowError::InvalidAnswer {
                    question: question_id,
                    answer: answer.to_string(),
                });
            }

            next.answers.record(question_id, answer);
            Ok(Transition::quiet(next))
        }

        (Step::Category(index), Event::Next) => {
            let category = category_at(catalog, state.step, index)?;
            let missing = missing_questions(catalog, &category.id, &state.answers)
                .map_err(|_| FlowError::UnknownStep(state.step))?;
            if !missing.is_empty() {
                return Err(FlowError::Incomplete {
                    category: category.id.clone(),
                    missing,
                });
            }

            if index + 1 < catalog.len() {
                next.step = Step::Category(index + 1);
                return Ok(Transition::quiet(next));
            }

            submit(catalog, next)
        }

        (Step::Category(index), Event::Back) if index > 0 => {
            next.step = Step::Category(index - 1);
            Ok(Transition::quiet(next))
        }

        (Step::Results, Event::RecommendationsReady { recommendations }) => {
            next.recommendations = Some(recommendations);
            Ok(Transition::quiet(next))
        }

        (Step::Results, Event::Rate { rating }) => {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(FlowError::InvalidRating(rating));
            }
            if state.rating.is_some() {
                return Err(FlowError::AlreadyRated);
            }

            next.rating = Some(rating);
            Ok(Transition {
                state: next,
                effects: vec![Effect::LogFeedback { rating }],
            })
        }

        (step, event) => Err(FlowError::NotAccepting {
            event: event.name(),
            step,
        }),
    }
}

fn category_at(catalog: &Catalog, step: Step, index: usize) -> Result<&CategorySpec, FlowError> {
    catalog.category_at(index).ok_or(FlowError::UnknownStep(step))
}

/// Final `Next`: score once, move to results, request the collaborator effects
fn submit(catalog: &Catalog, mut next: AssessmentState) -> Result<Transition, FlowError> {
    let respondent = next.respondent.clone().ok_or(FlowError::MissingRespondent)?;
    let scores = compute_scores(catalog, &next.answers);

    info!(
        respondent_id = %next.respondent_id,
        overall = scores.overall(),
        "assessment submitted"
    );

    next.step = Step::Results;
    next.scores = Some(scores.clone());
    next.recommendations = None;
    next.rating = None;

    Ok(Transition {
        state: next,
        effects: vec![
            Effect::LogSubmission {
                respondent,
                scores: scores.clone(),
            },
            Effect::FetchRecommendations {
                scores: scores.clone(),
            },
            Effect::RecordHistory { scores },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn consent() -> ConsentForm {
        ConsentForm {
            age: Some(16),
            city: Some("Austin".to_string()),
            state: None,
            gender: Some(Gender::Female),
            age_confirmed: true,
        }
    }

    fn apply(catalog: &Catalog, state: &AssessmentState, event: Event) -> AssessmentState {
        reduce(catalog, state, event).unwrap().state
    }

    fn answer(id: &str, answer: Answer) -> Event {
        Event::Answer {
            question_id: id.to_string(),
            answer,
        }
    }

    fn consented(catalog: &Catalog) -> AssessmentState {
        apply(catalog, &AssessmentState::new("user_test".into()), Event::Consent(consent()))
    }

    #[test]
    fn test_consent_validation_messages() {
        let mut form = consent();
        form.age = None;
        assert_eq!(form.validate().unwrap_err().to_string(), "Please enter a valid age (13 or older).");

        form.age = Some(12);
        assert_eq!(form.validate().unwrap_err(), ConsentError::AgeBelowMinimum);

        form.age = Some(121);
        assert_eq!(form.validate().unwrap_err(), ConsentError::AgeAboveMaximum);

        form.age = Some(13);
        form.age_confirmed = false;
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Please confirm you are 13 or older to continue."
        );
    }

    #[test]
    fn test_consent_moves_to_first_category() {
        let catalog = Catalog::builtin();
        let state = consented(catalog);

        assert_eq!(state.step, Step::Category(0));
        let respondent = state.respondent.unwrap();
        assert_eq!(respondent.city, "Austin");
        assert_eq!(respondent.state, "Not provided");
    }

    #[test]
    fn test_rejected_consent_keeps_state() {
        let catalog = Catalog::builtin();
        let state = AssessmentState::new("user_test".into());
        let mut form = consent();
        form.age = Some(10);

        let err = reduce(catalog, &state, Event::Consent(form)).unwrap_err();
        assert_eq!(err, FlowError::Consent(ConsentError::AgeBelowMinimum));
        assert_eq!(state.step, Step::Consent);
    }

    #[test]
    fn test_next_blocked_until_category_complete() {
        let catalog = Catalog::builtin();
        let state = consented(catalog);
        let state = apply(catalog, &state, answer("sleep_quality", Answer::index(3)));

        let err = reduce(catalog, &state, Event::Next).unwrap_err();
        assert_eq!(
            err,
            FlowError::Incomplete {
                category: "sleep".to_string(),
                missing: vec!["sleep_consistency".to_string(), "screen_before_bed".to_string()],
            }
        );
    }

    #[test]
    fn test_next_reports_the_gaps_gating_sees() {
        let catalog = Catalog::builtin();
        let index = catalog.category_index("physical_activity").unwrap();
        let mut state = consented(catalog);
        state.step = Step::Category(index);
        let state = apply(catalog, &state, answer("strength_training", Answer::yes()));

        let expected = missing_questions(catalog, "physical_activity", &state.answers).unwrap();
        assert!(expected.contains(&"strength_days".to_string()));

        match reduce(catalog, &state, Event::Next).unwrap_err() {
            FlowError::Incomplete { category, missing } => {
                assert_eq!(category, "physical_activity");
                assert_eq!(missing, expected);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_answer_outside_current_category_is_refused() {
        let catalog = Catalog::builtin();
        let state = consented(catalog);

        assert!(matches!(
            reduce(catalog, &state, answer("fruits", Answer::value(2.0))),
            Err(FlowError::OutOfStep { .. })
        ));
        assert!(matches!(
            reduce(catalog, &state, answer("sleep_quality", Answer::index(5))),
            Err(FlowError::InvalidAnswer { .. })
        ));
        assert!(matches!(
            reduce(catalog, &state, answer("nap_length", Answer::index(0))),
            Err(FlowError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn test_back_navigation() {
        let catalog = Catalog::builtin();
        let mut state = consented(catalog);
        for id in ["sleep_consistency", "sleep_quality", "screen_before_bed"] {
            state = apply(catalog, &state, answer(id, Answer::index(4)));
        }
        state = apply(catalog, &state, Event::Next);
        assert_eq!(state.step, Step::Category(1));

        state = apply(catalog, &state, Event::Back);
        assert_eq!(state.step, Step::Category(0));
        assert_eq!(state.answers.len(), 3);

        assert_eq!(
            reduce(catalog, &state, Event::Back).unwrap_err(),
            FlowError::NotAccepting {
                event: "back",
                step: Step::Category(0),
            }
        );
    }

    #[test]
    fn test_progress() {
        let catalog = Catalog::builtin();
        let mut state = AssessmentState::new("user_test".into());
        assert_eq!(state.progress(catalog), 0.0);

        state.step = Step::Category(2);
        assert!((state.progress(catalog) - 50.0).abs() < 1e-9);

        state.step = Step::Results;
        assert_eq!(state.progress(catalog), 100.0);
    }

    #[test]
    fn test_rating_accepted_once_in_results() {
        let catalog = Catalog::builtin();
        let mut state = AssessmentState::new("user_test".into());
        state.step = Step::Results;

        assert_eq!(
            reduce(catalog, &state, Event::Rate { rating: 11 }).unwrap_err(),
            FlowError::InvalidRating(11)
        );

        let transition = reduce(catalog, &state, Event::Rate { rating: 8 }).unwrap();
        assert_eq!(transition.effects, vec![Effect::LogFeedback { rating: 8 }]);
        assert_eq!(
            reduce(catalog, &transition.state, Event::Rate { rating: 9 }).unwrap_err(),
            FlowError::AlreadyRated
        );
    }

    #[test]
    fn test_restart_keeps_respondent_id() {
        let catalog = Catalog::builtin();
        let state = consented(catalog);
        let state = apply(catalog, &state, answer("sleep_quality", Answer::index(2)));

        let restarted = apply(catalog, &state, Event::Restart);
        assert_eq!(restarted, AssessmentState::new("user_test".into()));
    }

    #[test]
    fn test_event_wire_format() {
        let event: Event =
            serde_json::from_str(r#"{"type": "answer", "question_id": "strength_training", "answer": "yes"}"#)
                .unwrap();
        assert_eq!(event, answer("strength_training", Answer::yes()));

        let event: Event = serde_json::from_str(r#"{"type": "consent", "age": 15, "age_confirmed": true}"#).unwrap();
        assert!(matches!(event, Event::Consent(ConsentForm { age: Some(15), .. })));

        let step = serde_json::to_value(Step::Category(3)).unwrap();
        assert_eq!(step, serde_json::json!({"kind": "category", "index": 3}));
    }
}
