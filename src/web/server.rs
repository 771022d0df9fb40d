//! Axum HTTP server for the quiz API.
//!
//! Routes: `/` (liveness), `/api/questions`, `/api/analyze` and
//! `/api/health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    routing::{get, post},
};
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::error::{AnalysisError, ServerError};
use crate::quiz::{PersonalityProfile, ProfileAnalyzer, Question, questions};
use crate::util::truncate_for_log;
use crate::web::types::*;

/// Request bodies are a handful of short answers.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared state for all handlers.
pub struct AppState {
    pub analyzer: ProfileAnalyzer,
    pub cors: CorsConfig,
    /// Fires graceful shutdown of the running server.
    pub shutdown_tx: RwLock<Option<oneshot::Sender<()>>>,
}

impl AppState {
    pub fn new(analyzer: ProfileAnalyzer, cors: CorsConfig) -> Self {
        Self {
            analyzer,
            cors,
            shutdown_tx: RwLock::new(None),
        }
    }

    /// Ask the server started by [`start_server`] to stop accepting
    /// connections. No-op if it was never started or already stopping.
    pub async fn request_shutdown(&self) {
        if let Some(tx) = self.shutdown_tx.write().await.take() {
            let _ = tx.send(());
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/questions", get(questions_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// CORS policy for the browser frontend.
///
/// Listed origins get credentials with any method and header mirrored back.
/// An empty list (or `*`) opens the API to every origin, without credentials.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any_origin() {
        tracing::warn!("CORS allows any origin");
        return CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(AllowMethods::any())
            .allow_headers(AllowHeaders::any());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Skipping unusable CORS origin");
                None
            }
        })
        .collect();

    tracing::info!(origins = ?config.allowed_origins, "CORS origins configured");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Bind `addr` and serve in a background task.
///
/// Returns the bound address (useful with port 0) and the server task, which
/// resolves once [`AppState::request_shutdown`] has drained connections.
pub async fn start_server(
    addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<(SocketAddr, JoinHandle<Result<(), ServerError>>), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
    let bound_addr = listener
        .local_addr()
        .map_err(|e| ServerError::BindFailed {
            addr: addr.to_string(),
            reason: format!("failed to get local addr: {e}"),
        })?;

    let app = build_router(state.clone());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    *state.shutdown_tx.write().await = Some(shutdown_tx);

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                ServerError::Serve(e.to_string())
            })
    });

    tracing::info!(addr = %bound_addr, "HTTP server listening");
    Ok((bound_addr, task))
}

// --- Handlers ---

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Fun Fortune API is running!",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn questions_handler() -> Json<&'static [Question]> {
    Json(questions())
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        mode: if state.analyzer.has_llm() {
            "llm"
        } else {
            "fallback"
        },
    })
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<PersonalityProfile>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected analyze body");
        bad_request(rejection.body_text())
    })?;

    tracing::info!(
        answers = req.answers.len(),
        first = req.answers.first().map(|a| truncate_for_log(a, 80)).unwrap_or_default(),
        "Analyze request"
    );

    match state.analyzer.analyze(&req.answers).await {
        Ok(analysis) => {
            tracing::info!(
                source = ?analysis.source,
                personality_type = %analysis.profile.personality_type,
                "Analysis complete"
            );
            Ok(Json(analysis.profile))
        }
        Err(e @ AnalysisError::EmptyInput) => Err(bad_request(e.to_string())),
    }
}
