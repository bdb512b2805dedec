//! The bot facade: identity validation, handler registration, outbound
//! sending, and the glue between the webhook, the routing pipeline, and
//! the batcher.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::{ApiClient, KikCodeOptions, UserProfile};
use crate::config::BotConfig;
use crate::errors::BotResult;
use crate::message::{Message, MessageType};
use crate::outbound::{Batcher, OutgoingHandler};
use crate::routing::{IncomingContext, IncomingHandler, Pipeline};
use crate::webhook;

/// One or more outbound messages. Plain strings become text messages.
pub struct Messages(pub(crate) Vec<Message>);

impl From<Message> for Messages {
    fn from(message: Message) -> Self {
        Messages(vec![message])
    }
}

impl From<Vec<Message>> for Messages {
    fn from(messages: Vec<Message>) -> Self {
        Messages(messages)
    }
}

impl From<&str> for Messages {
    fn from(body: &str) -> Self {
        Messages(vec![Message::text(body)])
    }
}

impl From<String> for Messages {
    fn from(body: String) -> Self {
        Messages(vec![Message::text(body)])
    }
}

/// One or more recipient identifiers. `()` means "no explicit recipient":
/// every message must then carry its own `to`.
pub struct Recipients(pub(crate) Vec<String>);

impl From<&str> for Recipients {
    fn from(recipient: &str) -> Self {
        Recipients(vec![recipient.to_string()])
    }
}

impl From<String> for Recipients {
    fn from(recipient: String) -> Self {
        Recipients(vec![recipient])
    }
}

impl From<Vec<String>> for Recipients {
    fn from(recipients: Vec<String>) -> Self {
        Recipients(recipients)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(recipients: Vec<&str>) -> Self {
        Recipients(recipients.into_iter().map(str::to_string).collect())
    }
}

impl From<()> for Recipients {
    fn from(_: ()) -> Self {
        Recipients(Vec::new())
    }
}

/// A bot instance. Register handlers before sharing it (registration takes
/// `&mut self`); sending and serving work through `&self`/`Arc<Self>`.
pub struct Bot {
    config: BotConfig,
    pipeline: Pipeline,
    batcher: Batcher,
    api: ApiClient,
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("config", &self.config)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl Bot {
    /// Construct a bot, failing fast on an invalid configuration.
    pub fn new(config: BotConfig) -> BotResult<Self> {
        config.validate()?;
        let api = ApiClient::new(&config);
        let batcher = Batcher::new(api.clone(), config.max_message_per_batch);
        Ok(Self {
            config,
            pipeline: Pipeline::new(),
            batcher,
            api,
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// The underlying REST client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ---- handler registration ---------------------------------------

    /// Register a handler for every inbound message.
    pub fn use_handler(&mut self, handler: impl IncomingHandler + 'static) {
        self.pipeline.use_handler(handler);
    }

    /// Register a handler for one message kind.
    pub fn on(&mut self, message_type: MessageType, handler: impl IncomingHandler + 'static) {
        self.pipeline.on(message_type, handler);
    }

    pub fn on_text_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::Text, handler);
    }

    pub fn on_link_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::Link, handler);
    }

    pub fn on_picture_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::Picture, handler);
    }

    pub fn on_video_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::Video, handler);
    }

    pub fn on_sticker_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::Sticker, handler);
    }

    pub fn on_is_typing_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::IsTyping, handler);
    }

    pub fn on_read_receipt_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::ReadReceipt, handler);
    }

    pub fn on_delivery_receipt_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::DeliveryReceipt, handler);
    }

    pub fn on_scan_data_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::ScanData, handler);
    }

    pub fn on_start_chatting_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::StartChatting, handler);
    }

    pub fn on_friend_picker_message(&mut self, handler: impl IncomingHandler + 'static) {
        self.on(MessageType::FriendPicker, handler);
    }

    /// Register an outgoing transform, run once per outbound message in
    /// registration order.
    pub fn outgoing(&mut self, handler: impl OutgoingHandler + 'static) {
        self.batcher.add_transform(Arc::new(handler));
    }

    // ---- sending ----------------------------------------------------

    /// Queue messages for per-recipient delivery. Fails synchronously when
    /// no recipient is resolvable; transmission happens on the next
    /// scheduling tick so same-tick sends share a wire batch.
    pub fn send(
        &self,
        messages: impl Into<Messages>,
        recipients: impl Into<Recipients>,
    ) -> BotResult<()> {
        let Messages(messages) = messages.into();
        let Recipients(recipients) = recipients.into();
        self.batcher.enqueue_direct(messages, &recipients)
    }

    /// Queue messages for the bulk fan-out endpoint.
    pub fn broadcast(
        &self,
        messages: impl Into<Messages>,
        recipients: impl Into<Recipients>,
    ) -> BotResult<()> {
        let Messages(messages) = messages.into();
        let Recipients(recipients) = recipients.into();
        self.batcher.enqueue_broadcast(messages, &recipients)
    }

    // ---- remote lookups ---------------------------------------------

    pub async fn get_user_profile(&self, username: &str) -> BotResult<UserProfile> {
        self.api.get_user_profile(username).await
    }

    pub async fn get_user_profiles(&self, usernames: &[&str]) -> BotResult<Vec<UserProfile>> {
        self.api.get_user_profiles(usernames).await
    }

    pub async fn get_kik_code_url(&self, options: &KikCodeOptions) -> BotResult<String> {
        self.api.kik_code_url(options).await
    }

    // ---- webhook ----------------------------------------------------

    /// The incoming-webhook router, for merging into a hosting axum app.
    pub fn incoming(self: &Arc<Self>) -> axum::Router {
        webhook::router(Arc::clone(self))
    }

    /// Bind and serve the incoming webhook on its own listener.
    pub async fn serve(self: Arc<Self>, addr: &str) -> BotResult<()> {
        let app = webhook::router(Arc::clone(&self));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(anyhow::Error::from)?;
        info!("incoming webhook listening on {}", addr);
        axum::serve(listener, app)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(())
    }

    /// Route one inbound message through the pipeline, then forward any
    /// accumulated replies to the batcher tagged with the sender.
    pub(crate) async fn dispatch(&self, message: Message) {
        let from = message.from_user().map(str::to_string);
        let mut context = IncomingContext::new(message);
        self.pipeline.dispatch(&mut context).await;

        if context.is_handled() {
            return;
        }
        let replies = context.take_replies();
        if replies.is_empty() {
            return;
        }

        match from {
            Some(from) => {
                if let Err(e) = self.batcher.enqueue_direct(replies, &[from]) {
                    error!("failed to queue replies: {}", e);
                }
            }
            None => warn!("dropping replies to a message with no sender"),
        }
    }
}
