use std::time::Duration;

use serde_json::json;
use synheart_lifestyle::recommend::{
    fallback_recommendations, recommend_or_fallback, GeminiRecommender, RecommendError,
    RecommendationProvider,
};
use synheart_lifestyle::{compute_scores, Answer, AnswerSet, Catalog, ScoreRecord};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const GENERATE_PATH: &str = "/models/gemini-test:generateContent";

fn recommender(server: &MockServer) -> GeminiRecommender {
    GeminiRecommender::with_config("test-key", server.uri(), MODEL, Duration::from_secs(5)).unwrap()
}

fn scores() -> ScoreRecord {
    let answers = AnswerSet::new()
        .with("sleep_quality", Answer::index(3))
        .with("strength_training", Answer::yes())
        .with("strength_days", Answer::value(3.0));
    compute_scores(Catalog::builtin(), &answers)
}

fn candidate(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}

#[tokio::test]
async fn gemini_parses_plain_json_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(
            r#"[{"category": "sleep", "title": "Wind down", "action": "No screens after 9pm.", "why": "Light delays sleep."},
                {"category": "nutrition", "title": "Add fruit", "action": "Eat one more fruit a day."}]"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let recs = recommender(&server).recommend(&scores()).await.unwrap();

    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].title, "Wind down");
    assert_eq!(recs[1].category, "nutrition");
    assert_eq!(recs[1].why, None);
}

#[tokio::test]
async fn gemini_strips_code_fence_around_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(
            "```json\n[{\"category\": \"stress_management\", \"title\": \"Breathe\", \"action\": \"Box breathing for 5 minutes.\", \"why\": \"Calms the nervous system.\"}]\n```",
        )))
        .mount(&server)
        .await;

    let recs = recommender(&server).recommend(&scores()).await.unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].category, "stress_management");
}

#[tokio::test]
async fn gemini_sends_scores_in_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("[]")))
        .mount(&server)
        .await;

    recommender(&server).recommend(&scores()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("5 short wellness tips"));
    assert!(prompt.contains(&scores().to_json().unwrap()));
}

#[tokio::test]
async fn gemini_non_success_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = recommender(&server).recommend(&scores()).await.unwrap_err();
    match err {
        RecommendError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failed_provider_yields_exact_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let recs = recommend_or_fallback(&recommender(&server), &scores()).await;
    assert_eq!(recs, fallback_recommendations());
}

#[tokio::test]
async fn missing_candidate_yields_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let provider = recommender(&server);
    let err = provider.recommend(&scores()).await.unwrap_err();
    assert!(matches!(err, RecommendError::MissingContent));

    let recs = recommend_or_fallback(&provider, &scores()).await;
    assert_eq!(recs, fallback_recommendations());
}

#[tokio::test]
async fn prose_candidate_yields_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Sleep more and drink water!")))
        .mount(&server)
        .await;

    let recs = recommend_or_fallback(&recommender(&server), &scores()).await;
    assert_eq!(recs, fallback_recommendations());
}
