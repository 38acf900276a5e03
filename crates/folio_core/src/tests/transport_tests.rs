use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use shared::error::ErrorCode;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};
use uuid::Uuid;

use super::*;

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<ContactMessage>>>>,
}

async fn handle_contact(
    State(state): State<ServerState>,
    Json(payload): Json<ContactMessage>,
) -> Json<ContactReceipt> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    Json(ContactReceipt {
        message_id: Uuid::nil(),
        received_at: Utc::now(),
    })
}

async fn handle_reject() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiError::new(ErrorCode::Validation, "1 contact field(s) failed validation")),
    )
}

async fn handle_plain_failure() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "upstream mail relay down")
}

async fn spawn_contact_server() -> (String, oneshot::Receiver<ContactMessage>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/contact", post(handle_contact))
        .route("/reject", post(handle_reject))
        .route("/broken", post(handle_plain_failure))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn message() -> ContactMessage {
    ContactMessage {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        subject: "Engines".into(),
        message: "About the analytical engine.".into(),
    }
}

#[test]
fn rejects_malformed_and_non_http_endpoints() {
    assert!(matches!(
        HttpMessageSender::new("not a url", DEFAULT_SEND_TIMEOUT),
        Err(SenderError::InvalidEndpoint { .. })
    ));
    assert!(matches!(
        HttpMessageSender::new("ftp://example.com/contact", DEFAULT_SEND_TIMEOUT),
        Err(SenderError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}

#[tokio::test]
async fn posts_json_and_returns_receipt() {
    let (base, payload_rx) = spawn_contact_server().await;
    let sender =
        HttpMessageSender::new(&format!("{base}/contact"), DEFAULT_SEND_TIMEOUT).expect("sender");

    let receipt = sender.send(&message()).await.expect("send");
    assert_eq!(receipt.message_id, Uuid::nil());

    let payload = payload_rx.await.expect("payload");
    assert_eq!(payload, message());
}

#[tokio::test]
async fn api_error_body_becomes_rejected_failure() {
    let (base, _payload_rx) = spawn_contact_server().await;
    let sender =
        HttpMessageSender::new(&format!("{base}/reject"), DEFAULT_SEND_TIMEOUT).expect("sender");

    let err = sender.send(&message()).await.expect_err("must fail");
    assert_eq!(
        err,
        SubmissionFailure::Rejected {
            status: 422,
            message: "1 contact field(s) failed validation".into(),
        }
    );
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let (base, _payload_rx) = spawn_contact_server().await;
    let sender =
        HttpMessageSender::new(&format!("{base}/broken"), DEFAULT_SEND_TIMEOUT).expect("sender");

    let err = sender.send(&message()).await.expect_err("must fail");
    assert_eq!(
        err,
        SubmissionFailure::Rejected {
            status: 502,
            message: "upstream mail relay down".into(),
        }
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let sender = HttpMessageSender::new(&format!("http://{addr}/contact"), DEFAULT_SEND_TIMEOUT)
        .expect("sender");
    let err = sender.send(&message()).await.expect_err("must fail");
    assert!(matches!(err, SubmissionFailure::Transport(_)), "got {err:?}");
}
