//! Outbound client for the LINE Messaging API reply endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// Errors from the reply API call.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("channel access token is not configured")]
    MissingToken,
    #[error("reply request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reply API returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Outbound reply request body.
///
/// The reply token is single-use; the platform rejects a second reply
/// with the same token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub reply_token: String,
    pub messages: Vec<TextMessage>,
}

/// A text message in an outbound reply.
#[derive(Debug, Serialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// Thin client for the LINE reply API.
///
/// Cloneable and shared across requests; the underlying reqwest client
/// pools connections internally.
#[derive(Clone)]
pub struct LineClient {
    http: Client,
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl LineClient {
    /// Create a new client for the given API base URL.
    pub fn new(base_url: impl Into<String>, access_token: Option<String>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            access_token,
            timeout,
        }
    }

    /// Create a client from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.line_api_base.clone(),
            config.channel_access_token.clone(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Send one text reply addressed by the event's reply token.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), ReplyError> {
        let token = self.access_token.as_deref().ok_or(ReplyError::MissingToken)?;

        let request = ReplyRequest {
            reply_token: reply_token.to_string(),
            messages: vec![TextMessage::new(text)],
        };

        let url = format!("{}/v2/bot/message/reply", self.base_url);

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Api { status, body });
        }

        info!(
            reply_token = %reply_token,
            status_code = status.as_u16(),
            "line_reply_sent"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_request_wire_format() {
        let request = ReplyRequest {
            reply_token: "token-1".to_string(),
            messages: vec![TextMessage::new("hi there")],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "replyToken": "token-1",
                "messages": [{"type": "text", "text": "hi there"}]
            })
        );
    }

    #[tokio::test]
    async fn test_reply_without_token_fails() {
        let client = LineClient::new(
            "http://127.0.0.1:9".to_string(),
            None,
            Duration::from_millis(100),
        );

        let err = client.reply("token-1", "hi").await.unwrap_err();
        assert!(matches!(err, ReplyError::MissingToken));
    }

    #[tokio::test]
    async fn test_reply_transport_error() {
        // Nothing listens on port 9; the send itself fails.
        let client = LineClient::new(
            "http://127.0.0.1:9".to_string(),
            Some("token".to_string()),
            Duration::from_millis(200),
        );

        let err = client.reply("token-1", "hi").await.unwrap_err();
        assert!(matches!(err, ReplyError::Transport(_)));
    }
}
