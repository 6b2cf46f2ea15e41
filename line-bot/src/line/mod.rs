//! LINE Messaging API integration.
//!
//! This module covers both directions of the platform boundary:
//! - `events`: deserialization of inbound webhook payloads
//! - `client`: the outbound reply API client

pub mod client;
pub mod events;

pub use client::{LineClient, ReplyError, ReplyRequest, TextMessage};
pub use events::{MessageContent, WebhookEvent, WebhookPayload};
