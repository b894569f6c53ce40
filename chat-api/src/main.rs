//! Chat Lambda - Runs one chat submission per request.
//!
//! Endpoint:
//! - POST /chat - Body `{ "session"?: ChatSession, "text": string }`
//!
//! The session lives on the client: it is sent with every request and the
//! updated transcript is returned together with the reply. Callers without
//! identity claims use the assistant in demo mode.

mod http;

use std::sync::Arc;

use assistant::{actor_from_claims, ActorContext, Assistant, ChatSession, Config, Message};
use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, RequestPayloadExt, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

use crate::http::{assistant_error_response, error_response, json_response, ApiResponse};

/// Chat request
#[derive(Debug, Deserialize, Validate)]
struct ChatRequest {
    #[serde(default)]
    session: Option<ChatSession>,
    #[validate(length(min = 1, max = 1000))]
    text: String,
}

/// Chat response
#[derive(Debug, Serialize)]
struct ChatResponse {
    session: ChatSession,
    reply: Message,
}

/// Application state
struct AppState {
    assistant: Assistant,
}

impl AppState {
    fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        info!(backend = %config.backend_url, "Configured backend");
        Ok(Self {
            assistant: Assistant::from_config(&config)?,
        })
    }
}

/// Caller identity from the Cognito authorizer, if any.
fn extract_actor(event: &Request) -> Option<ActorContext> {
    let claims = event
        .request_context_ref()
        .and_then(|ctx| ctx.authorizer())
        .and_then(|a| a.fields.get("claims"))?;

    match actor_from_claims(claims) {
        Ok(actor) => actor,
        Err(e) => {
            warn!("Ignoring unusable claims, continuing in demo mode: {}", e);
            None
        }
    }
}

/// Reject requests the assistant should never see.
fn check_request(request: &ChatRequest) -> assistant::Result<()> {
    request
        .validate()
        .map_err(|e| assistant::Error::Validation(format!("Invalid request: {}", e)))?;
    if request.text.trim().is_empty() {
        return Err(assistant::Error::Validation("Text cannot be empty".to_string()));
    }
    if let Some(session) = &request.session {
        session.validate()?;
    }
    Ok(())
}

/// Decode the request body.
fn parse_request(event: &Request) -> assistant::Result<ChatRequest> {
    match event.payload() {
        Ok(Some(req)) => Ok(req),
        Ok(None) => Err(assistant::Error::Validation("Missing request body".to_string())),
        Err(e) => Err(assistant::Error::Validation(format!("Invalid request: {}", e))),
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() != Method::POST {
        return error_response(405, "Method not allowed");
    }

    let actor = extract_actor(&event);

    let request = match parse_request(&event).and_then(|req| check_request(&req).map(|_| req)) {
        Ok(req) => req,
        Err(e) => {
            warn!("Rejecting chat request: {}", e);
            return assistant_error_response(&e);
        }
    };

    let mut session = request
        .session
        .unwrap_or_else(|| ChatSession::new(actor.as_ref()));

    info!(
        session = %session.id(),
        messages = session.messages().len(),
        "Processing chat message"
    );

    let reply = state
        .assistant
        .submit(&mut session, &request.text, actor.as_ref())
        .await;

    json_response(200, &ApiResponse::success(ChatResponse { session, reply }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new()?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
