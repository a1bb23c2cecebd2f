#![allow(dead_code)]

use anyhow::Context as _;
use futures::StreamExt as _;
use serde_json::json;
use std::time::Duration;
use tokio::io::AsyncBufReadExt as _;
use tokio_util::io::StreamReader;

/// Minimal MCP client for the server's stateless streamable HTTP endpoint (`/mcp`).
///
/// Stateless mode means no session header and no handshake: every request stands alone and is
/// answered on its own event stream.
pub struct McpHttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl McpHttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn request(
        &self,
        id: u64,
        method: &str,
        params: serde_json::Value,
        timeout_dur: Duration,
    ) -> anyhow::Result<serde_json::Value> {
        let resp = self
            .post(json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }))
            .await?
            .error_for_status()
            .context("POST /mcp status")?;

        let msg = tokio::time::timeout(timeout_dur, read_first_event_stream_json_message(resp))
            .await
            .context("timeout waiting for event-stream response")??;
        anyhow::ensure!(msg.get("id") == Some(&json!(id)), "unexpected response id: {msg}");
        Ok(msg)
    }

    pub async fn call_tool(
        &self,
        id: u64,
        name: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let msg = self
            .request(
                id,
                "tools/call",
                json!({ "name": name, "arguments": arguments }),
                Duration::from_secs(10),
            )
            .await?;
        msg.get("result")
            .cloned()
            .with_context(|| format!("tools/call {name} missing result: {msg}"))
    }

    pub async fn post(&self, body: serde_json::Value) -> anyhow::Result<reqwest::Response> {
        self.client
            .post(format!("{}/mcp", self.base_url))
            .header("Accept", "application/json, text/event-stream")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("POST /mcp")
    }
}

/// First text content of a tool result.
pub fn result_text(result: &serde_json::Value) -> anyhow::Result<&str> {
    result
        .get("content")
        .and_then(serde_json::Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("text"))
        .and_then(serde_json::Value::as_str)
        .context("tool result missing content[0].text")
}

/// First text content of a tool result, parsed as JSON.
pub fn result_json(result: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(result_text(result)?).context("tool result text is not JSON")
}

async fn read_first_event_stream_json_message(
    resp: reqwest::Response,
) -> anyhow::Result<serde_json::Value> {
    let mut stream = resp.bytes_stream();
    let byte_stream = futures::stream::poll_fn(move |cx| stream.poll_next_unpin(cx))
        .map(|r| r.map_err(std::io::Error::other));
    let reader = StreamReader::new(byte_stream);
    let mut lines = tokio::io::BufReader::new(reader).lines();

    let mut data_lines: Vec<String> = Vec::new();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim_end().to_string();

        if line.is_empty() {
            if data_lines.is_empty() {
                continue;
            }
            let data = data_lines.join("\n");
            return serde_json::from_str(&data).context("parse event-stream data as JSON");
        }

        if let Some(v) = line.strip_prefix("data:") {
            let v = v.trim();
            if !v.is_empty() {
                data_lines.push(v.to_string());
            }
        }
    }

    // Streams that end without a trailing blank line still carry a message.
    if !data_lines.is_empty() {
        return serde_json::from_str(&data_lines.join("\n")).context("parse event-stream data as JSON");
    }
    anyhow::bail!("event-stream ended without a JSON message")
}
