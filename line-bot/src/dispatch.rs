//! Event dispatcher for verified webhook payloads.
//!
//! The callback endpoint hands over the raw body only after the signature
//! check passed. From that point nothing propagates back to the HTTP
//! response: a malformed payload is dropped with a warning, unhandled event
//! kinds are skipped, and reply send failures are logged and swallowed.

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::line::{LineClient, MessageContent, WebhookEvent, WebhookPayload};

/// Suffix appended to every echoed reply.
pub const REPLY_SUFFIX: &str = " - reply from server!!";

/// Build the reply text for an inbound text message.
pub fn echo_text(input: &str) -> String {
    format!("{}{}", input, REPLY_SUFFIX)
}

/// Counters describing what a dispatch pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Replies delivered to the platform
    pub replied: usize,
    /// Reply attempts that failed (logged, not surfaced)
    pub failed: usize,
    /// Events skipped because this bot does not handle them
    pub ignored: usize,
}

/// Parse a verified webhook body and reply to each text message event.
///
/// Each event produces at most one reply attempt; all attempts within one
/// payload run concurrently.
pub async fn dispatch_webhook(client: &LineClient, body: &[u8]) -> DispatchOutcome {
    let payload: WebhookPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "webhook_payload_invalid");
            return DispatchOutcome::default();
        }
    };

    let mut ignored = 0usize;
    let mut replies = Vec::new();

    for event in payload.events {
        match event {
            WebhookEvent::Message {
                reply_token,
                message: MessageContent::Text { text, .. },
            } => replies.push((reply_token, text)),
            WebhookEvent::Message { reply_token, .. } => {
                debug!(reply_token = %reply_token, "webhook_event_skipped_non_text");
                ignored += 1;
            }
            WebhookEvent::Unknown => {
                debug!("webhook_event_skipped_unknown_type");
                ignored += 1;
            }
        }
    }

    let sends: Vec<_> = replies
        .into_iter()
        .map(|(reply_token, text)| send_reply(client, reply_token, text))
        .collect();

    let results = join_all(sends).await;

    let replied = results.iter().filter(|&&ok| ok).count();
    let failed = results.len() - replied;

    info!(
        replied = replied,
        failed = failed,
        ignored = ignored,
        "webhook_dispatch_complete"
    );

    DispatchOutcome {
        replied,
        failed,
        ignored,
    }
}

/// Send one echo reply and report whether it succeeded.
async fn send_reply(client: &LineClient, reply_token: String, text: String) -> bool {
    let reply = echo_text(&text);

    match client.reply(&reply_token, &reply).await {
        Ok(()) => true,
        Err(e) => {
            error!(reply_token = %reply_token, error = %e, "reply_send_failed");
            false
        }
    }
}
