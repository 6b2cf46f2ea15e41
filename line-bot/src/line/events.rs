//! Inbound webhook event types.
//!
//! LINE delivers webhook calls as a JSON envelope with an `events` array.
//! Only text message events are handled; every other event type (follow,
//! unfollow, postback, ...) and message kind (sticker, image, ...)
//! deserializes to `Unknown` and is skipped by the dispatcher.

use serde::Deserialize;

/// Webhook envelope posted by the platform to the callback endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Bot user ID the events were sent to
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEvent {
    /// An inbound message. The reply token is single-use and addresses
    /// exactly one reply to the originating conversation.
    #[serde(rename = "message", rename_all = "camelCase")]
    Message {
        reply_token: String,
        message: MessageContent,
    },
    /// Any event type this bot does not handle.
    #[serde(other)]
    Unknown,
}

/// Message content carried by a message event, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContent {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        id: String,
        text: String,
    },
    /// Sticker, image, video, and other content kinds.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_message_event() {
        let body = r#"{
            "destination": "U0123456789abcdef",
            "events": [{
                "type": "message",
                "mode": "active",
                "timestamp": 1700000000000,
                "source": {"type": "user", "userId": "Uabc"},
                "replyToken": "reply-token-1",
                "message": {"type": "text", "id": "444", "text": "hello"}
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.destination, "U0123456789abcdef");
        assert_eq!(payload.events.len(), 1);

        match &payload.events[0] {
            WebhookEvent::Message {
                reply_token,
                message: MessageContent::Text { id, text },
            } => {
                assert_eq!(reply_token, "reply-token-1");
                assert_eq!(id, "444");
                assert_eq!(text, "hello");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_unknown_event_type() {
        let body = r#"{
            "events": [{
                "type": "follow",
                "replyToken": "reply-token-2",
                "source": {"type": "user", "userId": "Uabc"}
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        assert!(matches!(payload.events[0], WebhookEvent::Unknown));
    }

    #[test]
    fn test_deserialize_non_text_message_content() {
        let body = r#"{
            "events": [{
                "type": "message",
                "replyToken": "reply-token-3",
                "message": {"type": "sticker", "id": "555", "packageId": "1", "stickerId": "2"}
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(body).unwrap();
        match &payload.events[0] {
            WebhookEvent::Message { reply_token, message } => {
                assert_eq!(reply_token, "reply-token-3");
                assert!(matches!(message, MessageContent::Unknown));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_empty_events() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"destination":"U1","events":[]}"#).unwrap();
        assert!(payload.events.is_empty());
    }
}
