use thiserror::Error;

/// Typed error hierarchy for the SDK.
///
/// Use at crate boundaries (construction, send/broadcast, remote API calls).
/// Internal/leaf functions can continue using `anyhow::Result` — the
/// `Internal` variant allows seamless conversion via the `?` operator.
///
/// Protocol-level failures on the webhook path (bad signature, malformed
/// payload) are converted to HTTP status codes and never surface to calling
/// code; `Config` and `RecipientRequired` are synchronous caller errors.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signature verification failed")]
    Unauthorized,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Message decode error: {0}")]
    Decode(String),

    #[error("Recipient required: {0}")]
    RecipientRequired(String),

    #[error("Delivery error: {endpoint} returned status {status}")]
    Delivery { endpoint: String, status: u16 },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for results using `BotError`.
pub type BotResult<T> = std::result::Result<T, BotError>;

impl BotError {
    /// Whether this error maps to an HTTP client-error status on the
    /// webhook path rather than a server fault.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            BotError::Unauthorized | BotError::MalformedPayload(_) | BotError::Decode(_)
        )
    }
}
