//! LINE webhook relay bot.
//!
//! A single-endpoint relay for the LINE Messaging API: it receives message
//! events on `POST /callback`, verifies the `X-Line-Signature` over the raw
//! body, and echoes text messages back through the reply API.
//!
//! ## Architecture
//!
//! ```text
//! LINE platform → /callback → signature check → dispatcher → reply API
//! ```
//!
//! No state outlives a request; reply delivery failures are logged and
//! never surface to the inbound response.

pub mod config;
pub mod dispatch;
pub mod line;
pub mod tunnel;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{dispatch_webhook, echo_text, DispatchOutcome};
pub use line::{LineClient, ReplyError};
pub use web::AppState;
