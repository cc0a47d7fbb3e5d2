//! HTTP surface for the advisor and renderer.
//!
//! - `POST /api/rewrite`: `{prompt}` in, always `200 {patch}` out
//! - `POST /api/render`: `{prompt}` in, `{text, token}` out
//! - `GET /api/templates`: the template catalog

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{Advisor, RewriteResponse};
use crate::codec;
use crate::error::Result;
use crate::model::PromptSpec;
use crate::render::render;
use crate::templates::{templates, PromptTemplate};

#[derive(Clone)]
struct AppState {
    advisor: Arc<Advisor>,
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    text: String,
    token: String,
}

/// Build the router around `advisor`.
pub fn router(advisor: Advisor) -> Router {
    let state = AppState {
        advisor: Arc::new(advisor),
    };
    Router::new()
        .route("/api/rewrite", post(rewrite))
        .route("/api/render", post(render_prompt))
        .route("/api/templates", get(list_templates))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, advisor: Advisor) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving prompt API");
    axum::serve(listener, router(advisor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

/// Parse `{"prompt": PromptSpec}` out of a raw request body.
fn prompt_from_body(body: &[u8]) -> Option<PromptSpec> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "request body is not JSON");
            return None;
        }
    };
    let prompt = value.get("prompt")?.clone();
    match serde_json::from_value(prompt) {
        Ok(spec) => Some(spec),
        Err(e) => {
            debug!(error = %e, "request prompt is not a full spec");
            None
        }
    }
}

async fn rewrite(State(state): State<AppState>, body: Bytes) -> Json<RewriteResponse> {
    let Some(spec) = prompt_from_body(&body) else {
        return Json(RewriteResponse::default());
    };
    let patch = state.advisor.suggest(&spec).await;
    Json(RewriteResponse { patch })
}

async fn render_prompt(body: Bytes) -> Response {
    match prompt_from_body(&body) {
        Some(spec) => Json(RenderResponse {
            text: render(&spec),
            token: codec::encode(&spec),
        })
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "expected a JSON body of the form {\"prompt\": {...}}" })),
        )
            .into_response(),
    }
}

async fn list_templates() -> Json<Vec<PromptTemplate>> {
    Json(templates())
}
