use serde::{Deserialize, Serialize};

/// A suggested-response entry offered to the recipient.
///
/// The `friend-picker` variant intentionally serializes every optional
/// field, emitting `null` when unset — the platform expects the explicit
/// absent-value markers, unlike everywhere else in the wire format where
/// unset fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    Text {
        body: String,
    },
    FriendPicker {
        body: Option<String>,
        min: Option<u32>,
        max: Option<u32>,
        preselected: Option<Vec<String>>,
    },
}

impl Response {
    /// A text suggested response.
    pub fn text(body: impl Into<String>) -> Self {
        Response::Text { body: body.into() }
    }

    /// A friend-picker suggested response. Every parameter is optional;
    /// unset ones serialize as explicit `null`.
    pub fn friend_picker(
        body: Option<String>,
        min: Option<u32>,
        max: Option<u32>,
        preselected: Option<Vec<String>>,
    ) -> Self {
        Response::FriendPicker {
            body,
            min,
            max,
            preselected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum KeyboardKind {
    #[default]
    #[serde(rename = "suggested")]
    Suggested,
}

/// A suggested-response keyboard attached to an outbound message,
/// optionally scoped to a single recipient via `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyboard {
    #[serde(rename = "type", default)]
    pub(crate) kind: KeyboardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Keyboard {
    pub(crate) fn new(to: Option<String>, hidden: Option<bool>) -> Self {
        Self {
            kind: KeyboardKind::Suggested,
            to,
            hidden,
            responses: Vec::new(),
        }
    }
}

/// One or more suggested responses, accepted wherever a keyboard is built.
/// Plain strings become text responses.
pub struct Responses(pub(crate) Vec<Response>);

impl From<Response> for Responses {
    fn from(response: Response) -> Self {
        Responses(vec![response])
    }
}

impl From<Vec<Response>> for Responses {
    fn from(responses: Vec<Response>) -> Self {
        Responses(responses)
    }
}

impl From<&str> for Responses {
    fn from(body: &str) -> Self {
        Responses(vec![Response::text(body)])
    }
}

impl From<String> for Responses {
    fn from(body: String) -> Self {
        Responses(vec![Response::text(body)])
    }
}

impl From<Vec<&str>> for Responses {
    fn from(bodies: Vec<&str>) -> Self {
        Responses(bodies.into_iter().map(Response::text).collect())
    }
}

impl From<Vec<String>> for Responses {
    fn from(bodies: Vec<String>) -> Self {
        Responses(bodies.into_iter().map(Response::text).collect())
    }
}
