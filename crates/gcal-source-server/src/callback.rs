//! The `/oAuthCallback` handler.
//!
//! Google redirects the operator's browser here after the consent screen.
//! The handler exchanges the authorization code and prints the resulting
//! token pair for the operator to store. Nothing is persisted.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use gcal_source_providers::google::{TokenExchanger, TokenPair};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Body returned after a successful exchange.
pub const SUCCESS_BODY: &str = "Successfully authorized.";

/// Shared state of the callback route.
#[derive(Clone)]
pub struct CallbackState {
    exchanger: Arc<dyn TokenExchanger>,
}

impl CallbackState {
    pub fn new(exchanger: Arc<dyn TokenExchanger>) -> Self {
        Self { exchanger }
    }
}

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Builds the router serving the callback at `path`.
pub fn callback_router(path: &str, state: CallbackState) -> Router {
    Router::new()
        .route(path, get(handle_callback))
        .with_state(state)
}

/// Text telling the operator how to persist a freshly issued pair.
pub fn persist_instructions(tokens: &TokenPair) -> String {
    let mut text = format!(
        "Authorization complete. Add these lines to your .env file:\n\n{}",
        tokens.env_lines()
    );
    if tokens.refresh_token.is_none() {
        text.push_str(
            "\n\nNo refresh token was issued; revoke the app's access in your \
             Google account to get one on the next authorization.",
        );
    }
    text
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, String) {
    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        warn!(%error, "authorization was not granted");
        return (StatusCode::OK, error);
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        debug!("callback hit without code or error");
        return (
            StatusCode::BAD_REQUEST,
            "missing code parameter".to_string(),
        );
    };

    match state.exchanger.exchange(&code).await {
        Ok(tokens) => {
            info!("{}", persist_instructions(&tokens));
            (StatusCode::OK, SUCCESS_BODY.to_string())
        }
        Err(e) => {
            warn!(error = %e, "failed to exchange authorization code");
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
