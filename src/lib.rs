#![warn(clippy::pedantic)]
// Noisy doc/signature lints — would require annotating hundreds of pub functions
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference — keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
// Module structure — our message module has message::Message pattern by design
#![allow(clippy::module_name_repetitions)]

//! Server-side SDK for building chat bots on the Kik messaging platform.
//!
//! The SDK models the platform's wire messages as typed objects, receives
//! webhook callbacks (verifying their HMAC signature before parsing),
//! routes each inbound message through an ordered handler pipeline, and
//! batches outbound messages per recipient before delivering them to the
//! REST API.

pub mod api;
pub mod bot;
pub mod config;
pub mod errors;
pub mod message;
pub mod outbound;
pub mod routing;
pub mod webhook;

pub use api::{ApiClient, KikCodeColor, KikCodeOptions, UserProfile};
pub use bot::{Bot, Messages, Recipients};
pub use config::BotConfig;
pub use errors::{BotError, BotResult};
pub use message::{Attribution, Keyboard, Message, MessageType, Response, Responses};
pub use outbound::{FnOutgoingHandler, OutgoingHandler, outgoing_fn};
pub use routing::{
    FnHandler, IncomingContext, IncomingHandler, Next, Pipeline, handler_fn,
};
pub use webhook::SIGNATURE_HEADER;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
