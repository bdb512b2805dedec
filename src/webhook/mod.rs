//! Inbound webhook: an axum router the hosting application merges into its
//! own app. Requests to other paths fall through to the host's routes;
//! non-POST methods on the incoming path get 405 from axum's method
//! routing.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::bot::Bot;
use crate::message::Message;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the hex HMAC-SHA1 digest of the raw request body.
pub const SIGNATURE_HEADER: &str = "X-Kik-Signature";

/// Validate the platform signature against a raw payload.
pub(crate) fn verify_signature(api_key: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha1::new_from_slice(api_key.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    messages: Option<Vec<serde_json::Value>>,
}

/// Build the incoming-webhook router for a bot.
pub fn router(bot: Arc<Bot>) -> Router {
    let path = bot.config().incoming_path.clone();
    Router::new().route(&path, post(incoming)).with_state(bot)
}

/// POST handler for the incoming path. Signature verification happens on
/// the raw bytes before any JSON parsing so a forged payload cannot reach
/// the parser.
async fn incoming(
    State(bot): State<Arc<Bot>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let config = bot.config();

    if !config.skip_signature_check {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        let Some(signature) = signature else {
            warn!("incoming request missing {} header", SIGNATURE_HEADER);
            return StatusCode::FORBIDDEN;
        };
        if !verify_signature(&config.api_key, signature, &body) {
            warn!("incoming request failed signature verification");
            return StatusCode::FORBIDDEN;
        }
    }

    let Ok(payload) = serde_json::from_slice::<WebhookPayload>(&body) else {
        return StatusCode::BAD_REQUEST;
    };
    let Some(raw_messages) = payload.messages else {
        return StatusCode::BAD_REQUEST;
    };

    // Strict parse of every element before any dispatch: one undecodable
    // message rejects the whole request.
    let mut messages = Vec::with_capacity(raw_messages.len());
    for raw in raw_messages {
        match Message::from_json(raw) {
            Ok(message) => messages.push(message),
            Err(e) => {
                debug!("rejecting request with undecodable message: {}", e);
                return StatusCode::BAD_REQUEST;
            }
        }
    }

    debug!("dispatching {} inbound message(s)", messages.len());
    for message in messages {
        bot.dispatch(message).await;
    }

    StatusCode::OK
}
