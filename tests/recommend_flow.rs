use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cinesage::app::{build_router, AppState};
use cinesage::llm::LlmApi;
use cinesage::omdb::{MetadataApi, MovieRecord};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

struct FakeLlm {
    reply: Option<String>,
}

#[async_trait::async_trait]
impl LlmApi for FakeLlm {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("simulated Groq outage"))
    }
}

struct FakeMetadata {
    records: HashMap<String, MovieRecord>,
}

#[async_trait::async_trait]
impl MetadataApi for FakeMetadata {
    async fn lookup(&self, raw_title: &str) -> MovieRecord {
        let clean = raw_title.trim();
        self.records
            .get(clean)
            .cloned()
            .unwrap_or_else(|| MovieRecord::fallback(clean))
    }
}

fn app(reply: Option<&str>, records: HashMap<String, MovieRecord>) -> Router {
    build_router(AppState {
        llm: Arc::new(FakeLlm {
            reply: reply.map(str::to_string),
        }),
        metadata: Arc::new(FakeMetadata { records }),
    })
}

fn inception_record() -> MovieRecord {
    MovieRecord {
        imdb_id: Some("tt1375666".to_string()),
        title: "Inception".to_string(),
        poster: Some("http://x/p.jpg".to_string()),
        year: Some("2010".to_string()),
    }
}

async fn post_recommendations(app: Router, body: Value) -> (StatusCode, Value) {
    let res = app
        .oneshot(
            Request::post("/api/recommendations")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_endpoint_is_up() {
    let app = app(Some(""), HashMap::new());
    let res = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn recommends_and_enriches_movies() {
    let completion = "Here are my picks!\n\
        MOVIE 1: Inception\n\
        Rating: 9/10\n\
        Explanation: mind-bending\n\
        MOVIE 2: Memento";
    let records = HashMap::from([("Inception".to_string(), inception_record())]);
    let (status, body) = post_recommendations(
        app(Some(completion), records),
        json!({ "input": "something twisty" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"], completion);

    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);

    let first = &movies[0];
    assert_eq!(first["title"], "Inception");
    assert_eq!(first["rating"], 9.0);
    assert_eq!(first["explanation"], "mind-bending");
    assert_eq!(first["poster"], "http://x/p.jpg");
    assert_eq!(first["year"], "2010");
    assert_eq!(first["imdbId"], "tt1375666");
    let providers = first["watchProviders"].as_array().unwrap();
    assert_eq!(providers.len(), 8);
    assert_eq!(providers[0]["provider"], "Netflix");
    assert_eq!(providers[0]["type"], "stream");
    assert!(providers[1]["link"]
        .as_str()
        .unwrap()
        .contains("Inception%202010"));

    // Memento has no record: fallback card, but the links still render.
    let second = &movies[1];
    assert_eq!(second["title"], "Memento");
    assert_eq!(second["rating"], Value::Null);
    assert_eq!(second["poster"], Value::Null);
    assert_eq!(second["imdbId"], Value::Null);
    assert_eq!(second["watchProviders"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn rejects_blank_input() {
    for body in [json!({ "input": "   " }), json!({ "input": "" }), json!({})] {
        let (status, json) =
            post_recommendations(app(Some("unused"), HashMap::new()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Input is required");
    }
}

#[tokio::test]
async fn reports_llm_outage_as_unavailable() {
    let (status, body) =
        post_recommendations(app(None, HashMap::new()), json!({ "input": "anything" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "AI is temporarily unavailable");
}

#[tokio::test]
async fn freeform_completion_returns_empty_movie_list() {
    let completion = "I couldn't find anything matching that mood.";
    let (status, body) = post_recommendations(
        app(Some(completion), HashMap::new()),
        json!({ "input": "impossible request" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"], completion);
    assert_eq!(body["movies"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn failed_lookup_falls_back_to_parsed_title() {
    let completion = "MOVIE 1: Obscure Film\nRating: 7/10";
    let (status, body) = post_recommendations(
        app(Some(completion), HashMap::new()),
        json!({ "input": "deep cuts only" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let movie = &body["movies"][0];
    assert_eq!(movie["title"], "Obscure Film");
    assert_eq!(movie["rating"], 7.0);
    assert_eq!(movie["poster"], Value::Null);
    assert_eq!(movie["year"], Value::Null);
    assert_eq!(movie["watchProviders"].as_array().unwrap().len(), 8);
}
