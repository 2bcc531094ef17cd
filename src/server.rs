use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::handlers::{AnalysisError, AnalyzeHandler};
use crate::models::ErrorResponse;

pub struct AppState {
    pub analyze_handler: Arc<AnalyzeHandler>,
}

pub fn create_router(handler: Arc<AnalyzeHandler>, static_dir: Option<&Path>) -> Router {
    let state = Arc::new(AppState {
        analyze_handler: handler,
    });

    let router = Router::new()
        .route("/", get(root_handler))
        // Camera photos arrive as multi-megabyte data URLs.
        .route(
            "/api/analyze",
            post(analyze_handler).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", get(health_check))
        .with_state(state);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            log::info!("📂 Serving browser client from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            log::warn!(
                "⚠️ STATIC_DIR {} is not a directory, not serving it",
                dir.display()
            );
            router
        }
        None => router,
    }
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    log::info!("🔔 Analyze request received ({} bytes)", body.len());

    match state.analyze_handler.handle_body(&body).await {
        Ok(reply) => (StatusCode::OK, Json(reply.body)).into_response(),
        Err(e) => {
            match &e {
                AnalysisError::InvalidResponse { .. } => {
                    log::warn!("⚠️ Model reply rejected: {}", e);
                }
                _ => log::error!("❌ Analysis error: {:#}", e),
            }
            error_response(e.to_string())
        }
    }
}

fn error_response(message: String) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

async fn root_handler() -> &'static str {
    "NutriSnap analysis server - POST an image to /api/analyze"
}

async fn health_check() -> &'static str {
    "OK"
}
