//! Optional ngrok tunnel bootstrap for local development.
//!
//! Spawns the external `ngrok` agent for the configured port and reads the
//! public URL back from the agent's local inspection API. The tunnel is a
//! convenience for registering the webhook in the LINE Developer Console;
//! every failure here is logged and the server keeps running without it.

use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{info, warn};

/// How many times to poll the agent API for a tunnel before giving up.
const POLL_ATTEMPTS: u32 = 10;

/// Delay between agent API polls.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Tunnel list returned by the agent's `/api/tunnels` endpoint.
#[derive(Debug, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<TunnelInfo>,
}

#[derive(Debug, Deserialize)]
struct TunnelInfo {
    public_url: String,
    #[serde(default)]
    proto: String,
}

/// A running ngrok agent and its public URL.
pub struct TunnelHandle {
    child: Child,
    pub public_url: String,
}

impl TunnelHandle {
    /// Stop the agent process.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.child.kill().await {
            warn!(error = %e, "ngrok_shutdown_failed");
        } else {
            info!("ngrok_tunnel_stopped");
        }
    }
}

/// Start an ngrok tunnel for the given local port.
///
/// Returns `None` (after logging a warning) if the agent cannot be spawned
/// or no https tunnel shows up in time.
pub async fn start_tunnel(port: u16, api_url: &str) -> Option<TunnelHandle> {
    let spawned = Command::new("ngrok")
        .arg("http")
        .arg(port.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();

    let mut child = match spawned {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "ngrok_spawn_failed");
            return None;
        }
    };

    info!(port = port, "ngrok_agent_spawned");

    match wait_for_public_url(api_url).await {
        Some(public_url) => {
            info!(
                public_url = %public_url,
                webhook_url = %format!("{}/callback", public_url),
                "ngrok_tunnel_active"
            );
            Some(TunnelHandle { child, public_url })
        }
        None => {
            warn!(api_url = %api_url, "ngrok_tunnel_url_unavailable");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "ngrok_cleanup_failed");
            }
            None
        }
    }
}

/// Poll the agent inspection API until an https tunnel appears.
async fn wait_for_public_url(api_url: &str) -> Option<String> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/tunnels", api_url);

    for attempt in 0..POLL_ATTEMPTS {
        sleep(POLL_INTERVAL).await;

        let response = match client.get(&url).timeout(POLL_INTERVAL).send().await {
            Ok(r) => r,
            Err(_) => continue,
        };

        let list: TunnelList = match response.json().await {
            Ok(l) => l,
            Err(e) => {
                warn!(attempt = attempt, error = %e, "ngrok_agent_response_invalid");
                continue;
            }
        };

        if let Some(tunnel) = list
            .tunnels
            .iter()
            .find(|t| t.proto == "https" || t.public_url.starts_with("https://"))
        {
            return Some(tunnel.public_url.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tunnel_list_deserialization() {
        let body = r#"{
            "tunnels": [
                {"public_url": "http://abc.ngrok.io", "proto": "http"},
                {"public_url": "https://abc.ngrok.io", "proto": "https"}
            ],
            "uri": "/api/tunnels"
        }"#;

        let list: TunnelList = serde_json::from_str(body).unwrap();
        assert_eq!(list.tunnels.len(), 2);

        let https = list.tunnels.iter().find(|t| t.proto == "https").unwrap();
        assert_eq!(https.public_url, "https://abc.ngrok.io");
    }

    #[test]
    fn test_tunnel_list_empty() {
        let list: TunnelList = serde_json::from_str(r#"{"tunnels": []}"#).unwrap();
        assert!(list.tunnels.is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_public_url_unreachable_agent() {
        // No agent on port 9: polling runs out of attempts and yields None.
        let url = wait_for_public_url("http://127.0.0.1:9").await;
        assert!(url.is_none());
    }
}
