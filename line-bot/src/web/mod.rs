//! Web server module for the inbound webhook.
//!
//! This module provides the HTTP surface of the relay:
//! - Receives webhook calls from the LINE platform
//! - Verifies the request signature
//! - Dispatches verified payloads and returns 200 OK
//!
//! Reply delivery happens inside the dispatcher; its failures never reach
//! the inbound response.

pub mod handlers;
pub mod signature;

pub use handlers::{callback, health, AppState, HealthResponse, SIGNATURE_HEADER};
pub use signature::verify_line_signature;
