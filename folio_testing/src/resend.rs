//! A fake implementation of the Resend email API.
//!
//! Accepted emails are kept in an [`Inbox`]. Recipients in the
//! `reject.example` domain are refused with a validation error.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;

const SEND_ROUTE: &str = "/emails";
const REJECTED_DOMAIN: &str = "@reject.example";

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting fake resend server on {host}:{port}");
    info!("Resend endpoint: http://{host}:{port}/");
    info!("API key: {api_key:?}");
    info!("Emails to recipients ending in {REJECTED_DOMAIN:?} are rejected");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(api_key, Inbox::default()))
        .await
        .context("Failed to start HTTP server")
}

/// Start the fake server on an ephemeral local port in the background.
pub async fn spawn(api_key: impl Into<String>) -> anyhow::Result<(SocketAddr, Inbox)> {
    let inbox = Inbox::default();
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .context("Failed to bind to ephemeral port")?;
    let addr = listener.local_addr()?;

    let router = router(api_key.into(), inbox.clone());
    tokio::spawn(async move { axum::serve(listener, router).await });

    Ok((addr, inbox))
}

pub fn router(api_key: String, inbox: Inbox) -> Router<()> {
    Router::new()
        .route("/", routing::get(index))
        .route(SEND_ROUTE, routing::post(send))
        .with_state(Arc::new(AppState {
            api_key,
            inbox,
        }))
}

/// All emails the fake server has accepted so far.
#[derive(Debug, Clone, Default)]
pub struct Inbox(Arc<Mutex<Vec<ReceivedEmail>>>);

impl Inbox {
    pub async fn emails(&self) -> Vec<ReceivedEmail> {
        self.0.lock().await.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedEmail {
    pub id: String,
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
}

struct AppState {
    api_key: String,
    inbox: Inbox,
}

#[derive(Deserialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    reply_to: Option<String>,
    subject: String,
    html: Option<String>,
    text: Option<String>,
}

#[derive(Serialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    name: &'static str,
    message: &'static str,
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "name": "fake-resend" }))
}

async fn send(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SendEmailRequest>,
) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if token != Some(state.api_key.as_str()) {
        return error(StatusCode::UNAUTHORIZED, "invalid_api_key", "API key is invalid");
    }

    if request.to.is_empty() {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Missing `to` field.",
        );
    }

    if request.to.iter().any(|to| to.ends_with(REJECTED_DOMAIN)) {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "The recipient address was rejected.",
        );
    }

    let mut emails = state.inbox.0.lock().await;
    let id = format!("fake-{}", emails.len() + 1);
    emails.push(ReceivedEmail {
        id: id.clone(),
        from: request.from,
        to: request.to,
        reply_to: request.reply_to,
        subject: request.subject,
        html: request.html,
        text: request.text,
    });

    Json(SendEmailResponse { id }).into_response()
}

fn error(status: StatusCode, name: &'static str, message: &'static str) -> Response {
    let body = ErrorResponse {
        status_code: status.as_u16(),
        name,
        message,
    };
    (status, Json(body)).into_response()
}
