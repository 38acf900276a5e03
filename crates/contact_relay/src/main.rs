use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode, ValidationFailure},
    protocol::{ContactMessage, ContactReceipt, CONTACT_ROUTE},
    validation::validate_all,
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod inbox;

use app_state::AppState;
use config::{load_settings, prepare_inbox_path};
use inbox::Inbox;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let inbox_path = prepare_inbox_path(&settings.inbox_path)?;
    let state = AppState {
        inbox: Inbox::new(inbox_path.clone()),
    };
    let stored = state
        .inbox
        .entries()
        .await
        .with_context(|| format!("failed to read inbox '{}'", inbox_path.display()))?
        .len();
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(%addr, inbox = %inbox_path.display(), stored, "contact relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(CONTACT_ROUTE, post(submit_contact))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContactMessage>,
) -> Result<Json<ContactReceipt>, (StatusCode, Json<ApiError>)> {
    let fields = req.to_fields();
    let errors = validate_all(&fields);
    if !errors.is_empty() {
        warn!(
            invalid_fields = ?errors.fields().map(|f| f.as_str()).collect::<Vec<_>>(),
            "contact relay: rejected invalid message"
        );
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationFailure::new(errors).into()),
        ));
    }

    let receipt = state
        .inbox
        .append(ContactMessage::from_fields(&fields))
        .await
        .map_err(|e| {
            error!(error = %e, inbox = %state.inbox.path().display(), "contact relay: failed to store message");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(ErrorCode::Internal, "failed to store message")),
            )
        })?;

    info!(message_id = %receipt.message_id, "contact relay: message accepted");
    Ok(Json(receipt))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
