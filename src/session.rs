//! Assessment session
//!
//! Drives the pure reducer and runs the effects it requests against the
//! collaborators. [`AssessmentSession::dispatch`] returns as soon as the state
//! is reduced, so scores can be shown before any network call starts;
//! [`AssessmentSession::settle`] then runs the queued effects. The sink post and
//! the recommendation fetch run concurrently and neither waits on the other.
//! Collaborator failures are logged and dropped; they never change the
//! computed scores or block the flow.

use chrono::Local;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::flow::{reduce, AssessmentState, Effect, Event, FlowError, Step};
use crate::history::{load_or_empty, HistoryEntry, HistoryStore};
use crate::recommend::{recommend_or_fallback, RecommendationProvider};
use crate::sink::{FeedbackRecord, SubmissionRecord, SubmissionSink};
use crate::types::{RespondentId, ScoreRecord};

/// One respondent's run through the questionnaire
pub struct AssessmentSession<'c, R, S, H> {
    catalog: &'c Catalog,
    state: AssessmentState,
    pending: Vec<Effect>,
    history: Vec<HistoryEntry>,
    recommender: R,
    sink: S,
    store: H,
}

impl<'c, R, S, H> AssessmentSession<'c, R, S, H>
where
    R: RecommendationProvider,
    S: SubmissionSink,
    H: HistoryStore,
{
    /// Start a session with a fresh respondent id, loading any prior history
    pub fn start(catalog: &'c Catalog, recommender: R, sink: S, store: H) -> Self {
        Self::resume(catalog, AssessmentState::start(), recommender, sink, store)
    }

    /// Continue from an existing state
    pub fn resume(catalog: &'c Catalog, state: AssessmentState, recommender: R, sink: S, store: H) -> Self {
        let history = load_or_empty(&store, &state.respondent_id);
        info!(
            respondent_id = %state.respondent_id,
            previous = history.len(),
            "assessment session started"
        );

        Self {
            catalog,
            state,
            pending: Vec::new(),
            history,
            recommender,
            sink,
            store,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn state(&self) -> &AssessmentState {
        &self.state
    }

    pub fn respondent_id(&self) -> &RespondentId {
        &self.state.respondent_id
    }

    /// Prior completed assessments, including ones settled in this session
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Effects queued by `dispatch` and not yet run
    pub fn pending(&self) -> &[Effect] {
        &self.pending
    }

    /// Reduce one event and queue its effects without running them.
    ///
    /// A refused event leaves the session untouched.
    pub fn dispatch(&mut self, event: Event) -> Result<&AssessmentState, FlowError> {
        let transition = reduce(self.catalog, &self.state, event)?;
        self.state = transition.state;
        self.pending.extend(transition.effects);
        Ok(&self.state)
    }

    /// Run every queued effect once.
    ///
    /// History is appended first. The sink rows and the recommendation fetch
    /// are then awaited together; fetched recommendations are fed back as
    /// `RecommendationsReady` while the results step is still showing.
    pub async fn settle(&mut self) -> Result<&AssessmentState, FlowError> {
        let mut submissions = Vec::new();
        let mut feedback = Vec::new();
        let mut fetch: Option<ScoreRecord> = None;

        for effect in std::mem::take(&mut self.pending) {
            match effect {
                Effect::LogSubmission { respondent, scores } => submissions.push(SubmissionRecord::new(
                    self.catalog,
                    &respondent,
                    &scores,
                    Local::now().naive_local(),
                )),
                Effect::LogFeedback { rating } => {
                    feedback.push(FeedbackRecord::new(rating, Local::now().naive_local()))
                }
                Effect::FetchRecommendations { scores } => fetch = Some(scores),
                Effect::RecordHistory { scores } => self.record_history(scores),
            }
        }

        let recommender = &self.recommender;
        let sink = &self.sink;
        let (recommendations, ()) = tokio::join!(
            async {
                match &fetch {
                    Some(scores) => Some(recommend_or_fallback(recommender, scores).await),
                    None => None,
                }
            },
            post_rows(sink, &submissions, &feedback),
        );

        if let Some(recommendations) = recommendations {
            if self.state.step == Step::Results {
                let transition = reduce(
                    self.catalog,
                    &self.state,
                    Event::RecommendationsReady { recommendations },
                )?;
                self.state = transition.state;
            } else {
                debug!(step = %self.state.step, "session moved on, dropping recommendations");
            }
        }

        Ok(&self.state)
    }

    /// Dispatch an event and settle its effects
    pub async fn apply(&mut self, event: Event) -> Result<&AssessmentState, FlowError> {
        self.dispatch(event)?;
        self.settle().await
    }

    fn record_history(&mut self, scores: ScoreRecord) {
        let entry = HistoryEntry::new(scores);
        if let Err(e) = self.store.append(&self.state.respondent_id, entry.clone()) {
            warn!(error = %e, "failed to record history");
        }
        self.history.push(entry);
    }
}

/// Post submission and feedback rows, logging failures
async fn post_rows<S: SubmissionSink>(sink: &S, submissions: &[SubmissionRecord], feedback: &[FeedbackRecord]) {
    for record in submissions {
        if let Err(e) = sink.submit(record).await {
            warn!(error = %e, "failed to log submission");
        }
    }
    for record in feedback {
        if let Err(e) = sink.feedback(record).await {
            warn!(error = %e, "failed to log feedback");
        }
    }
}
