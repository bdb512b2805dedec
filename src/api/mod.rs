//! Thin client for the platform's REST API: message delivery, broadcast,
//! user profiles, and scan-code creation.

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BotConfig;
use crate::errors::{BotError, BotResult};
use crate::message::Message;

const DEFAULT_CODE_SIZE: u32 = 1200;

/// Remote API client. One call per wire batch; basic auth with the bot's
/// identity on every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    scan_code_base_url: String,
    username: String,
    api_key: String,
}

impl ApiClient {
    pub(crate) fn new(config: &BotConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
            scan_code_base_url: config.scan_code_base_url.clone(),
            username: config.username.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Deliver one wire batch to the direct-message endpoint.
    pub(crate) async fn send_messages(&self, messages: &[Message]) -> BotResult<()> {
        self.post_messages("/v1/message", messages).await
    }

    /// Deliver one wire batch to the bulk fan-out endpoint.
    pub(crate) async fn broadcast_messages(&self, messages: &[Message]) -> BotResult<()> {
        self.post_messages("/v1/broadcast", messages).await
    }

    async fn post_messages(&self, endpoint: &str, messages: &[Message]) -> BotResult<()> {
        debug!("delivering {} message(s) to {}", messages.len(), endpoint);
        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .basic_auth(&self.username, Some(&self.api_key))
            .json(&serde_json::json!({ "messages": messages }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BotError::Delivery {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            })
        }
    }

    /// Fetch one user's profile.
    pub async fn get_user_profile(&self, username: &str) -> BotResult<UserProfile> {
        let endpoint = format!("/v1/user/{username}");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::Delivery {
                endpoint,
                status: status.as_u16(),
            });
        }

        let mut profile: UserProfile =
            response.json().await.map_err(anyhow::Error::from)?;
        profile.username = username.to_string();
        Ok(profile)
    }

    /// Fetch several profiles concurrently, preserving input order.
    pub async fn get_user_profiles(&self, usernames: &[&str]) -> BotResult<Vec<UserProfile>> {
        try_join_all(usernames.iter().map(|u| self.get_user_profile(u))).await
    }

    /// Register an opaque data payload and return the scan-code id.
    pub async fn create_kik_code(&self, data: &serde_json::Value) -> BotResult<String> {
        let endpoint = "/v1/codes";
        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .basic_auth(&self.username, Some(&self.api_key))
            .json(&serde_json::json!({ "data": data }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::Delivery {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        #[derive(Deserialize)]
        struct CodeResponse {
            id: String,
        }

        let code: CodeResponse = response.json().await.map_err(anyhow::Error::from)?;
        Ok(code.id)
    }

    /// Build a scan-code image URL. With `data` set, the payload is
    /// registered first and the returned URL references the stored code;
    /// otherwise the code resolves to the bot's username.
    pub async fn kik_code_url(&self, options: &KikCodeOptions) -> BotResult<String> {
        let width = options.width.unwrap_or(DEFAULT_CODE_SIZE);
        let height = options.height.unwrap_or(DEFAULT_CODE_SIZE);
        let query = options
            .color
            .map(|c| format!("?c={}", c.value()))
            .unwrap_or_default();

        if let Some(data) = &options.data {
            let id = self.create_kik_code(data).await?;
            Ok(format!(
                "{}/api/v1/images/remote/{}/{}x{}.png{}",
                self.scan_code_base_url, id, width, height, query
            ))
        } else {
            Ok(format!(
                "{}/api/v1/images/username/{}/{}x{}.png{}",
                self.scan_code_base_url, self.username, width, height, query
            ))
        }
    }
}

/// Options for [`ApiClient::kik_code_url`]. Size defaults to 1200×1200.
#[derive(Debug, Clone, Default)]
pub struct KikCodeOptions {
    /// Opaque payload delivered back in `scan-data` messages when the code
    /// is scanned.
    pub data: Option<serde_json::Value>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color: Option<KikCodeColor>,
}

/// The platform's scan-code color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KikCodeColor {
    KikBlue = 0,
    Turquoise = 1,
    Mint = 2,
    Forest = 3,
    KikGreen = 4,
    Sunshine = 5,
    OrangeCreamsicle = 6,
    BloodOrange = 7,
    CandyAppleRed = 8,
    Salmon = 9,
    Coral = 10,
    Cranberry = 11,
    Lavender = 12,
    RoyalPurple = 13,
    Marine = 14,
    Steel = 15,
}

impl KikCodeColor {
    /// The numeric value used in scan-code image URLs.
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip)]
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_pic_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_pic_last_modified: Option<i64>,
}

impl UserProfile {
    /// The username the profile was fetched for.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn profile_pic_url(&self) -> Option<&str> {
        self.profile_pic_url.as_deref()
    }

    pub fn profile_pic_last_modified(&self) -> Option<i64> {
        self.profile_pic_last_modified
    }

    /// First and last name joined with a space, whichever are present.
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(first) = &self.first_name {
            parts.push(first.as_str());
        }
        if let Some(last) = &self.last_name {
            parts.push(last.as_str());
        }
        parts.join(" ")
    }

    /// The wire object as fetched (`username` is not part of it).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("profile serializes to JSON")
    }
}
