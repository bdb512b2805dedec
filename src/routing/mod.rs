//! Ordered handler pipeline for inbound messages.
//!
//! Handlers run strictly in registration order, one at a time. Each
//! receives the [`IncomingContext`] and a one-shot continuation token
//! ([`Next`]); the chain only advances when the handler invokes the
//! continuation, and stops as soon as a handler declines to or marks the
//! context handled via [`IncomingContext::ignore`].

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::message::{Message, MessageType};

/// One-shot continuation token handed to each handler. Invoking
/// [`proceed`](Self::proceed) more than once is inert.
pub struct Next {
    proceed: bool,
}

impl Next {
    pub(crate) fn new() -> Self {
        Self { proceed: false }
    }

    /// Allow the next handler in the chain to run.
    pub fn proceed(&mut self) {
        self.proceed = true;
    }

    pub(crate) fn consumed(&self) -> bool {
        self.proceed
    }
}

/// Wrapper around one inbound message carrying routing state and the
/// replies accumulated for its sender.
pub struct IncomingContext {
    message: Message,
    handled: bool,
    replies: Vec<Message>,
}

impl IncomingContext {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            handled: false,
            replies: Vec::new(),
        }
    }

    /// The inbound message being routed.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Stop the chain and suppress reply forwarding for this message.
    pub fn ignore(&mut self) {
        self.handled = true;
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Queue a reply to the sender. Plain strings become text messages.
    /// Replies are forwarded to the outbound batcher once the chain
    /// completes, not eagerly.
    pub fn reply(&mut self, message: impl Into<Message>) {
        self.replies.push(message.into());
    }

    /// Queue a typing indicator for the sender.
    pub fn start_typing(&mut self) {
        self.replies.push(Message::is_typing(true));
    }

    /// Queue the end of a typing indicator.
    pub fn stop_typing(&mut self) {
        self.replies.push(Message::is_typing(false));
    }

    /// Queue a read receipt for the inbound message.
    pub fn mark_read(&mut self) {
        match self.message.id() {
            Some(id) => {
                let receipt = Message::read_receipt(vec![id.to_string()]);
                self.replies.push(receipt);
            }
            None => warn!("cannot mark a message without an id as read"),
        }
    }

    /// Replies accumulated so far, in call order.
    pub fn replies(&self) -> &[Message] {
        &self.replies
    }

    pub(crate) fn take_replies(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.replies)
    }
}

/// A pipeline participant.
#[async_trait]
pub trait IncomingHandler: Send + Sync {
    async fn handle(&self, context: &mut IncomingContext, next: &mut Next);
}

/// Adapter turning a function into an [`IncomingHandler`].
///
/// ```ignore
/// fn greet<'a>(ctx: &'a mut IncomingContext, next: &'a mut Next) -> BoxFuture<'a, ()> {
///     Box::pin(async move {
///         ctx.reply("hi");
///         next.proceed();
///     })
/// }
/// pipeline.use_handler(handler_fn(greet));
/// ```
pub struct FnHandler<F>(F);

#[async_trait]
impl<F> IncomingHandler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut IncomingContext, &'a mut Next) -> BoxFuture<'a, ()> + Send + Sync,
{
    async fn handle(&self, context: &mut IncomingContext, next: &mut Next) {
        (self.0)(context, next).await;
    }
}

/// Wrap a function as a pipeline handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: for<'a> Fn(&'a mut IncomingContext, &'a mut Next) -> BoxFuture<'a, ()> + Send + Sync,
{
    FnHandler(f)
}

struct Registration {
    filter: Option<MessageType>,
    handler: Arc<dyn IncomingHandler>,
}

/// The ordered chain of registered handlers.
#[derive(Default)]
pub struct Pipeline {
    registrations: Vec<Registration>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unconditional handler.
    pub fn use_handler(&mut self, handler: impl IncomingHandler + 'static) {
        self.registrations.push(Registration {
            filter: None,
            handler: Arc::new(handler),
        });
    }

    /// Register a handler that only fires for one message kind.
    pub fn on(&mut self, message_type: MessageType, handler: impl IncomingHandler + 'static) {
        self.registrations.push(Registration {
            filter: Some(message_type),
            handler: Arc::new(handler),
        });
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run the chain for one inbound message. Returns once every eligible
    /// handler has run or the chain was stopped.
    pub async fn dispatch(&self, context: &mut IncomingContext) {
        let message_type = context.message().message_type();

        for registration in &self.registrations {
            if let Some(filter) = registration.filter {
                if filter != message_type {
                    continue;
                }
            }

            let mut next = Next::new();
            registration.handler.handle(context, &mut next).await;

            if context.is_handled() {
                debug!("{} message handled, chain stopped", message_type);
                return;
            }
            if !next.consumed() {
                debug!("handler did not continue, chain stopped");
                return;
            }
        }
    }
}
