use serde::{Deserialize, Serialize};

use crate::errors::{BotError, BotResult};

/// Default maximum messages per wire batch — the platform limit.
pub const DEFAULT_MAX_MESSAGE_PER_BATCH: usize = 100;

/// Broadcast batches are capped at the platform's fixed bulk limit.
pub const BROADCAST_BATCH_SIZE: usize = 100;

/// Bot identity and behavior configuration.
///
/// Deserializable so hosting applications can load it straight from their
/// own config files; all wire names are camelCase. Validation happens in
/// [`validate`](Self::validate), called by `Bot::new` — an invalid identity
/// never reaches request handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// The bot's username on the platform.
    pub username: String,

    /// Shared secret issued by the platform; also the HMAC signing key for
    /// inbound webhook payloads.
    #[serde(rename = "apiKey")]
    pub api_key: String,

    /// Path the inbound webhook listens on.
    #[serde(default = "default_incoming_path", rename = "incomingPath")]
    pub incoming_path: String,

    /// Disable signature verification. Test harnesses only.
    #[serde(default, rename = "skipSignatureCheck")]
    pub skip_signature_check: bool,

    /// Maximum messages per delivery batch to a single recipient.
    #[serde(default = "default_max_message_per_batch", rename = "maxMessagePerBatch")]
    pub max_message_per_batch: usize,

    /// Base URL of the messaging API.
    #[serde(default = "default_api_base_url", rename = "apiBaseUrl")]
    pub api_base_url: String,

    /// Base URL of the scan-code image service.
    #[serde(default = "default_scan_code_base_url", rename = "scanCodeBaseUrl")]
    pub scan_code_base_url: String,
}

fn default_incoming_path() -> String {
    "/incoming".to_string()
}

fn default_max_message_per_batch() -> usize {
    DEFAULT_MAX_MESSAGE_PER_BATCH
}

fn default_api_base_url() -> String {
    "https://api.kik.com".to_string()
}

fn default_scan_code_base_url() -> String {
    "https://scancode.kik.com".to_string()
}

impl BotConfig {
    /// Configuration for the given identity, with every other field at its
    /// default.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            incoming_path: default_incoming_path(),
            skip_signature_check: false,
            max_message_per_batch: default_max_message_per_batch(),
            api_base_url: default_api_base_url(),
            scan_code_base_url: default_scan_code_base_url(),
        }
    }

    /// Fail-fast validation of the bot identity and options.
    pub fn validate(&self) -> BotResult<()> {
        if !valid_username(&self.username) {
            return Err(BotError::Config(format!(
                "username must be 2-32 characters of [A-Za-z0-9_.], got {:?}",
                self.username
            )));
        }

        // Platform API keys are hyphenated UUIDs.
        if self.api_key.len() != 36 || uuid::Uuid::try_parse(&self.api_key).is_err() {
            return Err(BotError::Config("apiKey must be a UUID".to_string()));
        }

        if !self.incoming_path.starts_with('/') {
            return Err(BotError::Config(format!(
                "incomingPath must begin with '/', got {:?}",
                self.incoming_path
            )));
        }

        if self.max_message_per_batch == 0 {
            return Err(BotError::Config(
                "maxMessagePerBatch must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn valid_username(username: &str) -> bool {
    (2..=32).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
