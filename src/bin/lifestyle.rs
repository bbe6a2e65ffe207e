//! Lifestyle CLI - Command-line front end for Synheart Lifestyle
//!
//! Commands:
//! - take: Run the assessment (interactive on a TTY, scripted JSON on a pipe)
//! - score: Score an answers JSON document
//! - catalog: Print the question catalog
//! - doctor: Diagnose configuration

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_lifestyle::catalog::{builtin, Catalog, QuestionKind, QuestionSpec};
use synheart_lifestyle::config::{ConfigError, LifestyleConfig};
use synheart_lifestyle::flow::{AssessmentState, ConsentForm, Event, FlowError, Step, MAX_RATING, MIN_RATING};
use synheart_lifestyle::gating::missing_questions;
use synheart_lifestyle::history::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
use synheart_lifestyle::recommend::{
    GeminiRecommender, OfflineRecommender, RecommendError, RecommendationProvider,
};
use synheart_lifestyle::scoring::compute_scores;
use synheart_lifestyle::session::AssessmentSession;
use synheart_lifestyle::sink::{NoopSink, SheetSink, SinkError, SubmissionSink};
use synheart_lifestyle::telemetry::{self, TelemetryError};
use synheart_lifestyle::types::{
    Answer, AnswerSet, Gender, Recommendation, RespondentId, ScoreBand, ScoreRecord,
};
use synheart_lifestyle::{LifestyleError, LIFESTYLE_VERSION, PRODUCER_NAME};

type Session<'c> = AssessmentSession<
    'c,
    Box<dyn RecommendationProvider>,
    Box<dyn SubmissionSink>,
    Box<dyn HistoryStore>,
>;

type Input = io::Lines<io::StdinLock<'static>>;

/// Lifestyle - Self-assessment across the pillars of lifestyle medicine
#[derive(Parser)]
#[command(name = "lifestyle")]
#[command(author = "Synheart AI Inc")]
#[command(version = LIFESTYLE_VERSION)]
#[command(about = "Take and score the lifestyle medicine self-assessment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the assessment (interactive on a TTY, scripted JSON on a pipe)
    Take {
        /// Reuse a respondent id so earlier history is found
        #[arg(long)]
        respondent_id: Option<String>,

        /// Pretty-print the scripted-mode report
        #[arg(long)]
        pretty: bool,
    },

    /// Score an answers JSON document (`{"question_id": answer}`)
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the question catalog
    Catalog {
        /// Output the catalog as JSON
        #[arg(long)]
        json: bool,

        /// Show prompts as worded for this gender
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
    },

    /// Diagnose configuration
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Female,
    Male,
    NonBinary,
    PreferNotToSay,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Female => Gender::Female,
            GenderArg::Male => Gender::Male,
            GenderArg::NonBinary => Gender::NonBinary,
            GenderArg::PreferNotToSay => Gender::PreferNotToSay,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), LifestyleCliError> {
    let config = LifestyleConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Commands::Take {
            respondent_id,
            pretty,
        } => cmd_take(&config, respondent_id, pretty).await,

        Commands::Score { input, pretty } => cmd_score(&input, pretty),

        Commands::Catalog { json, gender } => cmd_catalog(json, gender.map(Gender::from)),

        Commands::Doctor { json } => cmd_doctor(&config, json),
    }
}

// ============================================================================
// take
// ============================================================================

async fn cmd_take(
    config: &LifestyleConfig,
    respondent_id: Option<String>,
    pretty: bool,
) -> Result<(), LifestyleCliError> {
    let state = match respondent_id {
        Some(id) => AssessmentState::new(RespondentId::from(id)),
        None => AssessmentState::start(),
    };

    let mut session: Session = AssessmentSession::resume(
        Catalog::builtin(),
        state,
        build_recommender(config)?,
        build_sink(config)?,
        build_store(config),
    );

    if atty::is(atty::Stream::Stdin) {
        take_interactive(&mut session).await
    } else {
        take_scripted(&mut session, pretty).await
    }
}

fn build_recommender(config: &LifestyleConfig) -> Result<Box<dyn RecommendationProvider>, LifestyleCliError> {
    if config.recommender.is_configured() {
        Ok(Box::new(GeminiRecommender::from_config(&config.recommender)?))
    } else {
        Ok(Box::new(OfflineRecommender))
    }
}

fn build_sink(config: &LifestyleConfig) -> Result<Box<dyn SubmissionSink>, LifestyleCliError> {
    Ok(match SheetSink::from_config(&config.sink)? {
        Some(sink) => Box::new(sink),
        None => Box::new(NoopSink),
    })
}

fn build_store(config: &LifestyleConfig) -> Box<dyn HistoryStore> {
    match &config.history.dir {
        Some(dir) => Box::new(FileHistoryStore::new(dir)),
        None => Box::new(MemoryHistoryStore::new()),
    }
}

/// Piped input for a non-interactive run
#[derive(Deserialize)]
struct ScriptedRun {
    consent: ConsentForm,
    #[serde(default)]
    answers: AnswerSet,
    #[serde(default)]
    rating: Option<u8>,
}

async fn take_scripted(session: &mut Session<'_>, pretty: bool) -> Result<(), LifestyleCliError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let script: ScriptedRun = serde_json::from_str(&input)?;

    let catalog = session.catalog();
    session.apply(Event::Consent(script.consent)).await?;

    for category in catalog.categories() {
        for question in &category.questions {
            if let Some(answer) = script.answers.get(&question.id) {
                session
                    .apply(Event::Answer {
                        question_id: question.id.clone(),
                        answer: *answer,
                    })
                    .await?;
            }
        }
        session.apply(Event::Next).await?;
    }

    if let Some(rating) = script.rating {
        session.apply(Event::Rate { rating }).await?;
    }

    let report = RunReport::from_session(session)?;
    let output = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");
    Ok(())
}

async fn take_interactive(session: &mut Session<'_>) -> Result<(), LifestyleCliError> {
    let mut input: Input = io::stdin().lock().lines();
    let catalog = session.catalog();

    loop {
        let step = session.state().step;
        match step {
            Step::Consent => {
                let form = ask_consent(&mut input)?;
                match session.apply(Event::Consent(form)).await {
                    Ok(_) => {}
                    Err(FlowError::Consent(e)) => println!("\n{e}\n"),
                    Err(e) => return Err(e.into()),
                }
            }

            Step::Category(index) => {
                let category = catalog
                    .category_at(index)
                    .ok_or(FlowError::UnknownStep(step))?;
                println!(
                    "\n== {} ({}/{}) ==",
                    category.label,
                    index + 1,
                    catalog.len()
                );

                // Re-evaluated after each answer so dependent questions appear when triggered
                loop {
                    let missing = missing_questions(catalog, &category.id, &session.state().answers)?;
                    let Some(question_id) = missing.first() else {
                        break;
                    };
                    let question = catalog.question(question_id)?;
                    let gender = session.state().respondent.as_ref().and_then(|r| r.gender);
                    let answer = ask_question(&mut input, question, gender)?;
                    session
                        .apply(Event::Answer {
                            question_id: question.id.clone(),
                            answer,
                        })
                        .await?;
                }

                if index + 1 < catalog.len() {
                    session.apply(Event::Next).await?;
                    continue;
                }

                // Scores are shown before any collaborator call is awaited
                session.dispatch(Event::Next)?;
                print_scores(catalog, session.state());
                println!("\nGenerating your personalized recommendations...");
                session.settle().await?;
                print_action_plan(session.state(), session.history().len());
            }

            Step::Results => {
                if session.state().rating.is_none() {
                    if let Some(rating) = ask_rating(&mut input)? {
                        session.apply(Event::Rate { rating }).await?;
                        println!("Thanks for your feedback!");
                    }
                }

                let again = read_line(&mut input, "\nTake the assessment again? (y/N): ")?;
                if again.trim().eq_ignore_ascii_case("y") {
                    session.apply(Event::Restart).await?;
                } else {
                    return Ok(());
                }
            }
        }
    }
}

fn read_line(input: &mut Input, label: &str) -> Result<String, LifestyleCliError> {
    print!("{label}");
    io::stdout().flush()?;
    match input.next() {
        Some(line) => Ok(line?),
        None => Err(LifestyleCliError::Aborted),
    }
}

fn ask_consent(input: &mut Input) -> Result<ConsentForm, LifestyleCliError> {
    println!("Lifestyle Medicine Self-Assessment");
    println!("==================================");
    println!("This is NOT medical advice and does NOT diagnose, treat, or prevent any disease.");
    println!("Always consult a healthcare provider before changing your health routine.\n");

    let age = read_line(input, "Age: ")?.trim().parse::<u32>().ok();
    let city = read_line(input, "City (optional): ")?;
    let state = read_line(input, "State (optional): ")?;

    println!("Gender (optional): 1) Female  2) Male  3) Non-binary  4) Prefer not to say");
    let gender = match read_line(input, "> ")?.trim() {
        "1" => Some(Gender::Female),
        "2" => Some(Gender::Male),
        "3" => Some(Gender::NonBinary),
        "4" => Some(Gender::PreferNotToSay),
        _ => None,
    };

    let confirmed = read_line(input, "I confirm I am 13 or older (y/n): ")?;

    Ok(ConsentForm {
        age,
        city: Some(city),
        state: Some(state),
        gender,
        age_confirmed: matches!(confirmed.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
    })
}

fn ask_question(
    input: &mut Input,
    question: &QuestionSpec,
    gender: Option<Gender>,
) -> Result<Answer, LifestyleCliError> {
    println!("\n{}", question.prompt_for(gender));
    match &question.kind {
        QuestionKind::Choice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                println!("  {}) {}", i + 1, option);
            }
        }
        QuestionKind::YesNo { .. } => println!("  y) Yes\n  n) No"),
        QuestionKind::Slider { min, max, unit, .. } => {
            println!("  Enter a value from {min} to {max} {unit}")
        }
    }

    loop {
        let raw = read_line(input, "> ")?;
        if let Some(answer) = parse_answer(question, raw.trim()) {
            if question.accepts(&answer) {
                return Ok(answer);
            }
        }
        println!("  Please enter a valid answer.");
    }
}

fn parse_answer(question: &QuestionSpec, raw: &str) -> Option<Answer> {
    match &question.kind {
        QuestionKind::Choice { .. } => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Answer::index(n - 1)),
        QuestionKind::YesNo { .. } => match raw.to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Answer::yes()),
            "n" | "no" => Some(Answer::no()),
            _ => None,
        },
        QuestionKind::Slider { .. } => raw.parse::<f64>().ok().map(Answer::value),
    }
}

fn ask_rating(input: &mut Input) -> Result<Option<u8>, LifestyleCliError> {
    println!("\nHow helpful was this assessment?");
    loop {
        let raw = read_line(
            input,
            &format!("Rate from {MIN_RATING} (not helpful) to {MAX_RATING} (extremely helpful), blank to skip: "),
        )?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<u8>() {
            Ok(n) if (MIN_RATING..=MAX_RATING).contains(&n) => return Ok(Some(n)),
            _ => println!("  Please enter a whole number from {MIN_RATING} to {MAX_RATING}."),
        }
    }
}

fn print_scores(catalog: &Catalog, state: &AssessmentState) {
    let Some(scores) = &state.scores else {
        return;
    };

    println!("\nYour Lifestyle Medicine Profile");
    println!("===============================");
    for entry in scores.iter() {
        let label = catalog
            .category(&entry.category_id)
            .map(|c| c.label.as_str())
            .unwrap_or(entry.category_id.as_str());
        let band = ScoreBand::for_score(entry.score);
        println!("  {:<20} {:>5.1}  [{}]", label, entry.score, band.as_str());
    }
    println!("  {:<20} {:>5.1}", "Overall", scores.overall());
}

fn print_action_plan(state: &AssessmentState, history_len: usize) {
    let Some(recommendations) = &state.recommendations else {
        return;
    };

    println!("\nYour Action Plan");
    println!("----------------");
    for (i, rec) in recommendations.iter().enumerate() {
        println!("{}. {} ({})", i + 1, rec.title, rec.category);
        println!("   {}", rec.action);
        if let Some(why) = &rec.why {
            println!("   Why: {why}");
        }
    }

    if history_len > 1 {
        println!("\nCompleted assessments on record: {history_len}");
    }
}

// ============================================================================
// score / catalog / doctor
// ============================================================================

fn cmd_score(input: &Path, pretty: bool) -> Result<(), LifestyleCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let answers: AnswerSet = serde_json::from_str(&input_data)?;
    let scores = compute_scores(Catalog::builtin(), &answers);
    let report = ScoreReport {
        overall: scores.overall(),
        scores,
    };

    let output = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");
    Ok(())
}

fn cmd_catalog(json: bool, gender: Option<Gender>) -> Result<(), LifestyleCliError> {
    let catalog = Catalog::builtin();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    for category in catalog.categories() {
        println!(
            "{} [{}] (max {} points)",
            category.label, category.id, category.max_attainable_points
        );
        for question in &category.questions {
            let condition = question
                .depends_on
                .as_ref()
                .map(|dep| format!(" (only if {} = {})", dep.question_id, dep.required))
                .unwrap_or_default();
            println!(
                "  - {} <{}>{}: {}",
                question.id,
                question.kind.type_name(),
                condition,
                question.prompt_for(gender)
            );
        }
        println!();
    }

    Ok(())
}

fn cmd_doctor(config: &LifestyleConfig, json: bool) -> Result<(), LifestyleCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "lifestyle_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Lifestyle version {}", LIFESTYLE_VERSION),
    });

    // Validate the built-in tables without touching the process-wide instance
    match Catalog::new(builtin::categories()) {
        Ok(catalog) => checks.push(DoctorCheck {
            name: "catalog".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "{} categories, {} questions",
                catalog.len(),
                catalog.questions().count()
            ),
        }),
        Err(e) => checks.push(DoctorCheck {
            name: "catalog".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        }),
    }

    checks.push(if config.recommender.is_configured() {
        match GeminiRecommender::from_config(&config.recommender) {
            Ok(recommender) => DoctorCheck {
                name: "recommender".to_string(),
                status: CheckStatus::Ok,
                message: format!("Gemini model {}", recommender.model()),
            },
            Err(e) => DoctorCheck {
                name: "recommender".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        }
    } else {
        DoctorCheck {
            name: "recommender".to_string(),
            status: CheckStatus::Warning,
            message: "GEMINI_API_KEY not set, fallback recommendations will be shown".to_string(),
        }
    });

    checks.push(match &config.sink.url {
        Some(url) => DoctorCheck {
            name: "sink".to_string(),
            status: CheckStatus::Ok,
            message: format!("Submissions posted to {url}"),
        },
        None => DoctorCheck {
            name: "sink".to_string(),
            status: CheckStatus::Warning,
            message: "LIFESTYLE_SINK_URL not set, submissions are not logged".to_string(),
        },
    });

    checks.push(match &config.history.dir {
        Some(dir) => {
            let store = FileHistoryStore::new(dir);
            match fs::create_dir_all(store.dir()) {
                Ok(()) => DoctorCheck {
                    name: "history".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("History stored in {}", store.dir().display()),
                },
                Err(e) => DoctorCheck {
                    name: "history".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot use history directory {}: {}", store.dir().display(), e),
                },
            }
        }
        None => DoctorCheck {
            name: "history".to_string(),
            status: CheckStatus::Warning,
            message: "LIFESTYLE_HISTORY_DIR not set, history is kept in memory only".to_string(),
        },
    });

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (scripted mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: LIFESTYLE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Lifestyle Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(LifestyleCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error handling

#[derive(Debug)]
enum LifestyleCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
    Telemetry(TelemetryError),
    Flow(FlowError),
    Lifestyle(LifestyleError),
    Recommend(RecommendError),
    Sink(SinkError),
    Aborted,
    DoctorFailed,
}

impl From<io::Error> for LifestyleCliError {
    fn from(e: io::Error) -> Self {
        LifestyleCliError::Io(e)
    }
}

impl From<serde_json::Error> for LifestyleCliError {
    fn from(e: serde_json::Error) -> Self {
        LifestyleCliError::Json(e)
    }
}

impl From<ConfigError> for LifestyleCliError {
    fn from(e: ConfigError) -> Self {
        LifestyleCliError::Config(e)
    }
}

impl From<TelemetryError> for LifestyleCliError {
    fn from(e: TelemetryError) -> Self {
        LifestyleCliError::Telemetry(e)
    }
}

impl From<FlowError> for LifestyleCliError {
    fn from(e: FlowError) -> Self {
        LifestyleCliError::Flow(e)
    }
}

impl From<LifestyleError> for LifestyleCliError {
    fn from(e: LifestyleError) -> Self {
        LifestyleCliError::Lifestyle(e)
    }
}

impl From<RecommendError> for LifestyleCliError {
    fn from(e: RecommendError) -> Self {
        LifestyleCliError::Recommend(e)
    }
}

impl From<SinkError> for LifestyleCliError {
    fn from(e: SinkError) -> Self {
        LifestyleCliError::Sink(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<LifestyleCliError> for CliError {
    fn from(e: LifestyleCliError) -> Self {
        match e {
            LifestyleCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            LifestyleCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            LifestyleCliError::Config(e) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check your environment or .env file".to_string()),
            },
            LifestyleCliError::Telemetry(e) => CliError {
                code: "TELEMETRY_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check LIFESTYLE_LOG_LEVEL or RUST_LOG".to_string()),
            },
            LifestyleCliError::Flow(e) => CliError {
                code: "FLOW_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure every applicable question has a valid answer".to_string()),
            },
            LifestyleCliError::Lifestyle(e) => CliError {
                code: "LIFESTYLE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'lifestyle catalog' to list valid ids".to_string()),
            },
            LifestyleCliError::Recommend(e) => CliError {
                code: "RECOMMENDER_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check GEMINI_API_KEY and GEMINI_BASE_URL".to_string()),
            },
            LifestyleCliError::Sink(e) => CliError {
                code: "SINK_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check LIFESTYLE_SINK_URL".to_string()),
            },
            LifestyleCliError::Aborted => CliError {
                code: "ABORTED".to_string(),
                message: "Input ended before the assessment was finished".to_string(),
                hint: None,
            },
            LifestyleCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct ScoreReport {
    scores: ScoreRecord,
    overall: f64,
}

#[derive(Serialize)]
struct RunReport {
    respondent_id: RespondentId,
    scores: ScoreRecord,
    overall: f64,
    recommendations: Vec<Recommendation>,
    rating: Option<u8>,
    completed_assessments: usize,
}

impl RunReport {
    fn from_session(session: &Session<'_>) -> Result<Self, LifestyleCliError> {
        let state = session.state();
        let scores = state
            .scores
            .clone()
            .ok_or(FlowError::NotAccepting {
                event: "report",
                step: state.step,
            })?;

        Ok(Self {
            respondent_id: state.respondent_id.clone(),
            overall: scores.overall(),
            scores,
            recommendations: state.recommendations.clone().unwrap_or_default(),
            rating: state.rating,
            completed_assessments: session.history().len(),
        })
    }
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
