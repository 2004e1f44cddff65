//! HTTP boundary: `POST /ask` and `GET /health`
//!
//! The query engine is an explicit lazily-initialized cache owned by the
//! server state: the first `/ask` loads the index, every later request
//! shares the handle. The index is read-only after load, so no locking is
//! needed.

use crate::answer::{Answer, QueryEngine};
use crate::config::Config;
use crate::error::{Error, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Shared server state
pub struct AppState {
    config: Config,
    engine: OnceCell<Arc<QueryEngine>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            engine: OnceCell::new(),
        }
    }

    /// The cached query engine, loaded on first use
    async fn engine(&self) -> Result<&Arc<QueryEngine>> {
        self.engine
            .get_or_try_init(|| async { QueryEngine::open(&self.config).map(Arc::new) })
            .await
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    question: String,
    k: Option<usize>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let state = Arc::new(AppState::new(config));
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Json<Answer>, (StatusCode, String)> {
    let k = request.k.unwrap_or(state.config.retrieval.k);

    let engine = state.engine().await.map_err(error_response)?;
    let answer = engine
        .answer(&request.question, k)
        .await
        .map_err(error_response)?;

    Ok(Json(answer))
}

fn error_response(e: Error) -> (StatusCode, String) {
    let status = match e {
        Error::Query(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
