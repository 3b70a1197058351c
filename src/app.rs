use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::llm::{GroqClient, LlmApi};
use crate::omdb::{MetadataApi, OmdbClient};
use crate::recommend::assemble;

const MAX_BODY_BYTES: usize = 64 * 1024;
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmApi>,
    pub metadata: Arc<dyn MetadataApi>,
}

pub async fn run_server() -> Result<()> {
    let llm: Arc<dyn LlmApi> = Arc::new(GroqClient::from_env()?);
    let metadata: Arc<dyn MetadataApi> = Arc::new(OmdbClient::from_env()?);
    let state = AppState { llm, metadata };

    let app = build_router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/recommendations", post(handle_recommendations))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "AI Movie Recommendation API" }))
}

#[derive(Deserialize)]
struct RecommendRequest {
    input: Option<String>,
}

async fn handle_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Response {
    let input = req.input.as_deref().map(str::trim).unwrap_or_default();
    if input.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Input is required" })),
        )
            .into_response();
    }

    info!("Recommendation request: '{}'", input);
    let raw = match state.llm.complete(input).await {
        Ok(text) => text,
        Err(e) => {
            // The one hard failure: no completion means nothing to serve.
            error!("LLM completion failed: {:?}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "AI is temporarily unavailable" })),
            )
                .into_response();
        }
    };

    let response = assemble(&state.metadata, &raw).await;
    Json(response).into_response()
}

fn cors_layer() -> CorsLayer {
    let origins_env = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
    let origins: Vec<HeaderValue> = origins_env
        .split(',')
        .filter_map(|origin| {
            let origin = origin.trim();
            if origin.is_empty() {
                return None;
            }
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid origin '{}' in ALLOWED_ORIGINS", origin);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
