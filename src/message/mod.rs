//! Typed model of the platform's wire messages.
//!
//! A [`Message`] is a tagged union over the platform's message kinds plus
//! the fields common to all of them. Parsing selects the variant by the
//! `type` discriminant and fails closed on an unknown one; serialization
//! emits exactly the fields that were set or present on parse, so a
//! parse→serialize round trip preserves field presence.

mod keyboard;

pub use keyboard::{Keyboard, Response, Responses};

use serde::{Deserialize, Serialize};

use crate::errors::{BotError, BotResult};

/// Message kind discriminant, used for per-kind handler filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Text,
    Link,
    Picture,
    Video,
    Sticker,
    IsTyping,
    ReadReceipt,
    DeliveryReceipt,
    ScanData,
    StartChatting,
    FriendPicker,
}

impl MessageType {
    /// The wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Link => "link",
            MessageType::Picture => "picture",
            MessageType::Video => "video",
            MessageType::Sticker => "sticker",
            MessageType::IsTyping => "is-typing",
            MessageType::ReadReceipt => "read-receipt",
            MessageType::DeliveryReceipt => "delivery-receipt",
            MessageType::ScanData => "scan-data",
            MessageType::StartChatting => "start-chatting",
            MessageType::FriendPicker => "friend-picker",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribution block shown on rich content (pictures, videos, links).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "iconUrl", skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Kind-specific payload. The `type` tag is inlined into the message
/// object; an unrecognized tag is a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub(crate) enum MessageBody {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Link {
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pic_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Opaque JSON passed through to the in-chat browser.
        #[serde(skip_serializing_if = "Option::is_none")]
        kik_js_data: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<Attribution>,
    },
    #[serde(rename_all = "camelCase")]
    Picture {
        #[serde(skip_serializing_if = "Option::is_none")]
        pic_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        no_forward: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<Attribution>,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        #[serde(skip_serializing_if = "Option::is_none")]
        video_url: Option<String>,
        #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
        looping: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        muted: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        autoplay: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        no_save: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<Attribution>,
    },
    #[serde(rename_all = "camelCase")]
    Sticker {
        #[serde(skip_serializing_if = "Option::is_none")]
        sticker_pack_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sticker_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    IsTyping {
        #[serde(skip_serializing_if = "Option::is_none")]
        is_typing: Option<bool>,
    },
    #[serde(rename_all = "camelCase")]
    ReadReceipt {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_ids: Option<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    DeliveryReceipt {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_ids: Option<Vec<String>>,
    },
    ScanData {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },
    StartChatting {},
    FriendPicker {
        #[serde(skip_serializing_if = "Option::is_none")]
        picked: Option<Vec<String>>,
    },
}

impl MessageBody {
    fn message_type(&self) -> MessageType {
        match self {
            MessageBody::Text { .. } => MessageType::Text,
            MessageBody::Link { .. } => MessageType::Link,
            MessageBody::Picture { .. } => MessageType::Picture,
            MessageBody::Video { .. } => MessageType::Video,
            MessageBody::Sticker { .. } => MessageType::Sticker,
            MessageBody::IsTyping { .. } => MessageType::IsTyping,
            MessageBody::ReadReceipt { .. } => MessageType::ReadReceipt,
            MessageBody::DeliveryReceipt { .. } => MessageType::DeliveryReceipt,
            MessageBody::ScanData { .. } => MessageType::ScanData,
            MessageBody::StartChatting {} => MessageType::StartChatting,
            MessageBody::FriendPicker { .. } => MessageType::FriendPicker,
        }
    }
}

/// One unit of chat content or event, inbound or outbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(flatten)]
    pub(crate) body: MessageBody,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timestamp: Option<i64>,
    #[serde(rename = "chatId", skip_serializing_if = "Option::is_none")]
    pub(crate) chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) participants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) mention: Option<String>,
    #[serde(rename = "readReceiptRequested", skip_serializing_if = "Option::is_none")]
    pub(crate) read_receipt_requested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) delay: Option<i64>,
    #[serde(rename = "typeTime", skip_serializing_if = "Option::is_none")]
    pub(crate) type_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) keyboards: Vec<Keyboard>,
}

impl Message {
    fn with_body(body: MessageBody) -> Self {
        Self {
            body,
            id: None,
            from: None,
            to: None,
            timestamp: None,
            chat_id: None,
            participants: None,
            mention: None,
            read_receipt_requested: None,
            delay: None,
            type_time: None,
            keyboards: Vec::new(),
        }
    }

    /// A text message.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body(MessageBody::Text {
            body: Some(body.into()),
        })
    }

    /// A link message pointing at `url`.
    pub fn link(url: impl Into<String>) -> Self {
        Self::with_body(MessageBody::Link {
            url: Some(url.into()),
            pic_url: None,
            title: None,
            text: None,
            kik_js_data: None,
            attribution: None,
        })
    }

    /// A picture message showing `pic_url`.
    pub fn picture(pic_url: impl Into<String>) -> Self {
        Self::with_body(MessageBody::Picture {
            pic_url: Some(pic_url.into()),
            no_forward: None,
            attribution: None,
        })
    }

    /// A video message playing `video_url`.
    pub fn video(video_url: impl Into<String>) -> Self {
        Self::with_body(MessageBody::Video {
            video_url: Some(video_url.into()),
            looping: None,
            muted: None,
            autoplay: None,
            no_save: None,
            attribution: None,
        })
    }

    /// A typing indicator.
    pub fn is_typing(typing: bool) -> Self {
        Self::with_body(MessageBody::IsTyping {
            is_typing: Some(typing),
        })
    }

    /// A read receipt for the given message ids.
    pub fn read_receipt(message_ids: Vec<String>) -> Self {
        Self::with_body(MessageBody::ReadReceipt {
            message_ids: Some(message_ids),
        })
    }

    /// Parse a wire object into a message. Fails closed on an unknown
    /// `type` discriminant or mismatched field shapes.
    pub fn from_json(value: serde_json::Value) -> BotResult<Self> {
        serde_json::from_value(value).map_err(|e| BotError::Decode(e.to_string()))
    }

    /// The canonical wire shape. Only fields that were set or present on
    /// parse appear.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("message serializes to JSON")
    }

    /// This message's kind.
    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }

    // ---- common-field accessors -------------------------------------

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn from_user(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to_user(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn participants(&self) -> Option<&[String]> {
        self.participants.as_deref()
    }

    pub fn mention(&self) -> Option<&str> {
        self.mention.as_deref()
    }

    pub fn read_receipt_requested(&self) -> Option<bool> {
        self.read_receipt_requested
    }

    pub fn delay(&self) -> Option<i64> {
        self.delay
    }

    pub fn type_time(&self) -> Option<i64> {
        self.type_time
    }

    pub fn keyboards(&self) -> &[Keyboard] {
        &self.keyboards
    }

    // ---- kind-specific accessors ------------------------------------

    /// Body text of a `text` message.
    pub fn text_body(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { body } => body.as_deref(),
            _ => None,
        }
    }

    /// Mutable access to a `text` message's body, primarily for outgoing
    /// transforms.
    pub fn text_body_mut(&mut self) -> Option<&mut String> {
        match &mut self.body {
            MessageBody::Text { body } => body.as_mut(),
            _ => None,
        }
    }

    /// URL of a `link` message.
    pub fn url(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Link { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Link { title, .. } => title.as_deref(),
            _ => None,
        }
    }

    pub fn link_text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Link { text, .. } => text.as_deref(),
            _ => None,
        }
    }

    pub fn kik_js_data(&self) -> Option<&serde_json::Value> {
        match &self.body {
            MessageBody::Link { kik_js_data, .. } => kik_js_data.as_ref(),
            _ => None,
        }
    }

    /// Picture URL of a `picture` or `link` message.
    pub fn pic_url(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Picture { pic_url, .. } | MessageBody::Link { pic_url, .. } => {
                pic_url.as_deref()
            }
            _ => None,
        }
    }

    pub fn no_forward(&self) -> Option<bool> {
        match &self.body {
            MessageBody::Picture { no_forward, .. } => *no_forward,
            _ => None,
        }
    }

    pub fn video_url(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Video { video_url, .. } => video_url.as_deref(),
            _ => None,
        }
    }

    pub fn looping(&self) -> Option<bool> {
        match &self.body {
            MessageBody::Video { looping, .. } => *looping,
            _ => None,
        }
    }

    pub fn muted(&self) -> Option<bool> {
        match &self.body {
            MessageBody::Video { muted, .. } => *muted,
            _ => None,
        }
    }

    pub fn autoplay(&self) -> Option<bool> {
        match &self.body {
            MessageBody::Video { autoplay, .. } => *autoplay,
            _ => None,
        }
    }

    pub fn no_save(&self) -> Option<bool> {
        match &self.body {
            MessageBody::Video { no_save, .. } => *no_save,
            _ => None,
        }
    }

    pub fn sticker_pack_id(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Sticker { sticker_pack_id, .. } => sticker_pack_id.as_deref(),
            _ => None,
        }
    }

    pub fn sticker_url(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Sticker { sticker_url, .. } => sticker_url.as_deref(),
            _ => None,
        }
    }

    /// Typing flag of an `is-typing` message.
    pub fn typing(&self) -> Option<bool> {
        match &self.body {
            MessageBody::IsTyping { is_typing } => *is_typing,
            _ => None,
        }
    }

    /// Message ids of a read or delivery receipt.
    pub fn message_ids(&self) -> Option<&[String]> {
        match &self.body {
            MessageBody::ReadReceipt { message_ids }
            | MessageBody::DeliveryReceipt { message_ids } => message_ids.as_deref(),
            _ => None,
        }
    }

    /// Opaque payload of a `scan-data` message.
    pub fn scan_data(&self) -> Option<&str> {
        match &self.body {
            MessageBody::ScanData { data } => data.as_deref(),
            _ => None,
        }
    }

    /// Participants picked in an inbound `friend-picker` message.
    pub fn picked(&self) -> Option<&[String]> {
        match &self.body {
            MessageBody::FriendPicker { picked } => picked.as_deref(),
            _ => None,
        }
    }

    pub fn attribution(&self) -> Option<&Attribution> {
        match &self.body {
            MessageBody::Link { attribution, .. }
            | MessageBody::Picture { attribution, .. }
            | MessageBody::Video { attribution, .. } => attribution.as_ref(),
            _ => None,
        }
    }

    pub fn attribution_name(&self) -> Option<&str> {
        self.attribution().and_then(|a| a.name.as_deref())
    }

    pub fn attribution_icon(&self) -> Option<&str> {
        self.attribution().and_then(|a| a.icon_url.as_deref())
    }

    // ---- type predicates --------------------------------------------

    pub fn is_text_message(&self) -> bool {
        self.message_type() == MessageType::Text
    }

    pub fn is_link_message(&self) -> bool {
        self.message_type() == MessageType::Link
    }

    pub fn is_picture_message(&self) -> bool {
        self.message_type() == MessageType::Picture
    }

    pub fn is_video_message(&self) -> bool {
        self.message_type() == MessageType::Video
    }

    pub fn is_sticker_message(&self) -> bool {
        self.message_type() == MessageType::Sticker
    }

    pub fn is_is_typing_message(&self) -> bool {
        self.message_type() == MessageType::IsTyping
    }

    pub fn is_read_receipt_message(&self) -> bool {
        self.message_type() == MessageType::ReadReceipt
    }

    pub fn is_delivery_receipt_message(&self) -> bool {
        self.message_type() == MessageType::DeliveryReceipt
    }

    pub fn is_scan_data_message(&self) -> bool {
        self.message_type() == MessageType::ScanData
    }

    pub fn is_start_chatting_message(&self) -> bool {
        self.message_type() == MessageType::StartChatting
    }

    pub fn is_friend_picker_message(&self) -> bool {
        self.message_type() == MessageType::FriendPicker
    }

    /// Whether the message mentions the bot.
    pub fn is_mention(&self) -> bool {
        self.mention.is_some()
    }

    // ---- fluent setters ---------------------------------------------
    //
    // Setters that do not apply to the message's kind are no-ops; the
    // platform object model is permissive and widening the typed payload
    // for it would defeat the tagged union.

    pub fn set_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn set_mention(mut self, mention: impl Into<String>) -> Self {
        self.mention = Some(mention.into());
        self
    }

    pub fn set_delay(mut self, delay: i64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_type_time(mut self, type_time: i64) -> Self {
        self.type_time = Some(type_time);
        self
    }

    pub fn set_pic_url(mut self, value: impl Into<String>) -> Self {
        match &mut self.body {
            MessageBody::Picture { pic_url, .. } | MessageBody::Link { pic_url, .. } => {
                *pic_url = Some(value.into());
            }
            _ => {}
        }
        self
    }

    pub fn set_no_forward(mut self, value: bool) -> Self {
        if let MessageBody::Picture { no_forward, .. } = &mut self.body {
            *no_forward = Some(value);
        }
        self
    }

    pub fn set_title(mut self, value: impl Into<String>) -> Self {
        if let MessageBody::Link { title, .. } = &mut self.body {
            *title = Some(value.into());
        }
        self
    }

    pub fn set_text(mut self, value: impl Into<String>) -> Self {
        if let MessageBody::Link { text, .. } = &mut self.body {
            *text = Some(value.into());
        }
        self
    }

    pub fn set_kik_js_data(mut self, value: serde_json::Value) -> Self {
        if let MessageBody::Link { kik_js_data, .. } = &mut self.body {
            *kik_js_data = Some(value);
        }
        self
    }

    pub fn set_loop(mut self, value: bool) -> Self {
        if let MessageBody::Video { looping, .. } = &mut self.body {
            *looping = Some(value);
        }
        self
    }

    pub fn set_muted(mut self, value: bool) -> Self {
        if let MessageBody::Video { muted, .. } = &mut self.body {
            *muted = Some(value);
        }
        self
    }

    pub fn set_autoplay(mut self, value: bool) -> Self {
        if let MessageBody::Video { autoplay, .. } = &mut self.body {
            *autoplay = Some(value);
        }
        self
    }

    pub fn set_no_save(mut self, value: bool) -> Self {
        if let MessageBody::Video { no_save, .. } = &mut self.body {
            *no_save = Some(value);
        }
        self
    }

    pub fn set_attribution_name(mut self, value: impl Into<String>) -> Self {
        if let Some(attribution) = self.attribution_mut() {
            attribution.get_or_insert_with(Attribution::default).name = Some(value.into());
        }
        self
    }

    pub fn set_attribution_icon(mut self, value: impl Into<String>) -> Self {
        if let Some(attribution) = self.attribution_mut() {
            attribution.get_or_insert_with(Attribution::default).icon_url = Some(value.into());
        }
        self
    }

    fn attribution_mut(&mut self) -> Option<&mut Option<Attribution>> {
        match &mut self.body {
            MessageBody::Link { attribution, .. }
            | MessageBody::Picture { attribution, .. }
            | MessageBody::Video { attribution, .. } => Some(attribution),
            _ => None,
        }
    }

    // ---- suggested-response keyboards -------------------------------

    /// Append a text suggested response to the unscoped keyboard.
    pub fn add_text_response(self, body: impl Into<String>) -> Self {
        self.add_response_keyboard(Response::text(body), None, None)
    }

    /// Append several text suggested responses to the unscoped keyboard,
    /// in order.
    pub fn add_text_responses<I, S>(self, bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let responses: Vec<Response> = bodies.into_iter().map(Response::text).collect();
        self.add_response_keyboard(responses, None, None)
    }

    /// Append suggested responses, optionally hidden and scoped to one
    /// recipient. Responses for a scope that already has a keyboard merge
    /// into it in call order; a new scope appends a new keyboard. The
    /// absent scope is a scope of its own and never merges with a named
    /// one.
    pub fn add_response_keyboard(
        mut self,
        responses: impl Into<Responses>,
        hidden: Option<bool>,
        to: Option<&str>,
    ) -> Self {
        let Responses(responses) = responses.into();

        if let Some(keyboard) = self
            .keyboards
            .iter_mut()
            .find(|k| k.to.as_deref() == to)
        {
            keyboard.responses.extend(responses);
        } else {
            let mut keyboard = Keyboard::new(to.map(str::to_string), hidden);
            keyboard.responses = responses;
            self.keyboards.push(keyboard);
        }
        self
    }
}

impl From<&str> for Message {
    fn from(body: &str) -> Self {
        Message::text(body)
    }
}

impl From<String> for Message {
    fn from(body: String) -> Self {
        Message::text(body)
    }
}

#[cfg(test)]
mod tests;
