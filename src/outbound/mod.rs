//! Outbound batching: recipient-keyed queues, an outgoing transform chain,
//! and a coalesced flush that delivers wire batches under the configured
//! size cap.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use tracing::{debug, error};

use crate::api::ApiClient;
use crate::config::BROADCAST_BATCH_SIZE;
use crate::errors::{BotError, BotResult};
use crate::message::Message;
use crate::routing::Next;

/// A transform applied to every outbound message immediately before it is
/// placed into its wire batch. Same one-shot continuation discipline as the
/// inbound pipeline; a transform that does not continue drops the message.
#[async_trait]
pub trait OutgoingHandler: Send + Sync {
    async fn handle(&self, message: &mut Message, next: &mut Next);
}

/// Adapter turning a function into an [`OutgoingHandler`].
pub struct FnOutgoingHandler<F>(F);

#[async_trait]
impl<F> OutgoingHandler for FnOutgoingHandler<F>
where
    F: for<'a> Fn(&'a mut Message, &'a mut Next) -> BoxFuture<'a, ()> + Send + Sync,
{
    async fn handle(&self, message: &mut Message, next: &mut Next) {
        (self.0)(message, next).await;
    }
}

/// Wrap a function as an outgoing transform.
pub fn outgoing_fn<F>(f: F) -> FnOutgoingHandler<F>
where
    F: for<'a> Fn(&'a mut Message, &'a mut Next) -> BoxFuture<'a, ()> + Send + Sync,
{
    FnOutgoingHandler(f)
}

#[derive(Default)]
struct QueueState {
    /// Pending direct messages grouped by recipient, in first-enqueue
    /// order so flush order is deterministic.
    direct: IndexMap<String, Vec<Message>>,
    /// Pending broadcast messages; size-capped but never grouped.
    broadcast: Vec<Message>,
    flush_scheduled: bool,
}

struct Shared {
    api: ApiClient,
    max_batch: usize,
    transforms: RwLock<Vec<Arc<dyn OutgoingHandler>>>,
    state: Mutex<QueueState>,
}

/// The per-bot outbound queue and flush scheduler. All state is owned by
/// the bot instance; nothing is process-global.
pub(crate) struct Batcher {
    shared: Arc<Shared>,
}

impl Batcher {
    pub(crate) fn new(api: ApiClient, max_batch: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                max_batch,
                transforms: RwLock::new(Vec::new()),
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    pub(crate) fn add_transform(&self, handler: Arc<dyn OutgoingHandler>) {
        self.shared
            .transforms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Queue messages for per-recipient delivery. With no explicit
    /// recipients, each message must carry its own `to`.
    pub(crate) fn enqueue_direct(
        &self,
        messages: Vec<Message>,
        recipients: &[String],
    ) -> BotResult<()> {
        let pairs = expand(messages, recipients)?;

        let mut state = self.lock_state();
        for (recipient, message) in pairs {
            state.direct.entry(recipient).or_default().push(message);
        }
        self.schedule_flush(&mut state);
        Ok(())
    }

    /// Queue messages for the bulk fan-out endpoint. The expansion is
    /// size-capped at flush time but not grouped by recipient.
    pub(crate) fn enqueue_broadcast(
        &self,
        messages: Vec<Message>,
        recipients: &[String],
    ) -> BotResult<()> {
        let pairs = expand(messages, recipients)?;

        let mut state = self.lock_state();
        state.broadcast.extend(pairs.into_iter().map(|(_, m)| m));
        self.schedule_flush(&mut state);
        Ok(())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// At most one flush is pending per bot instance; it runs after one
    /// cooperative yield so every send issued in the current tick lands in
    /// the same batch.
    fn schedule_flush(&self, state: &mut QueueState) {
        if state.flush_scheduled {
            return;
        }
        state.flush_scheduled = true;

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            flush(&shared).await;
        });
    }
}

/// Normalize the messages × recipients expansion, stamping each copy's
/// `to`. Fails synchronously when no recipient is resolvable.
fn expand(
    messages: Vec<Message>,
    recipients: &[String],
) -> BotResult<Vec<(String, Message)>> {
    if messages.is_empty() {
        return Ok(Vec::new());
    }

    if recipients.is_empty() {
        messages
            .into_iter()
            .map(|message| {
                let to = message.to_user().map(str::to_string);
                match to {
                    Some(to) => Ok((to, message)),
                    None => Err(BotError::RecipientRequired(
                        "no recipients given and message has no `to`".to_string(),
                    )),
                }
            })
            .collect()
    } else {
        let mut pairs = Vec::with_capacity(messages.len() * recipients.len());
        for recipient in recipients {
            for message in &messages {
                pairs.push((recipient.clone(), message.clone().set_to(recipient.clone())));
            }
        }
        Ok(pairs)
    }
}

/// Drain every queue atomically, then deliver chunk by chunk. A failed
/// chunk is logged and does not prevent later chunks; there is no retry.
async fn flush(shared: &Shared) {
    let (direct, broadcast) = {
        let mut state = shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.flush_scheduled = false;
        (
            std::mem::take(&mut state.direct),
            std::mem::take(&mut state.broadcast),
        )
    };

    let transforms = shared
        .transforms
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    for (recipient, queued) in direct {
        let outgoing = transform_all(&transforms, queued).await;
        for chunk in outgoing.chunks(shared.max_batch) {
            if let Err(e) = shared.api.send_messages(chunk).await {
                error!("delivery to {} failed: {}", recipient, e);
            }
        }
    }

    if !broadcast.is_empty() {
        let outgoing = transform_all(&transforms, broadcast).await;
        for chunk in outgoing.chunks(BROADCAST_BATCH_SIZE) {
            if let Err(e) = shared.api.broadcast_messages(chunk).await {
                error!("broadcast delivery failed: {}", e);
            }
        }
    }
}

async fn transform_all(
    transforms: &[Arc<dyn OutgoingHandler>],
    queued: Vec<Message>,
) -> Vec<Message> {
    let mut outgoing = Vec::with_capacity(queued.len());
    for mut message in queued {
        if apply_transforms(transforms, &mut message).await {
            outgoing.push(message);
        } else {
            debug!("outgoing transform dropped a message");
        }
    }
    outgoing
}

/// Run the transform chain once for one message, in registration order.
/// Returns false when a transform declined to continue.
async fn apply_transforms(
    transforms: &[Arc<dyn OutgoingHandler>],
    message: &mut Message,
) -> bool {
    for transform in transforms {
        let mut next = Next::new();
        transform.handle(message, &mut next).await;
        if !next.consumed() {
            return false;
        }
    }
    true
}
