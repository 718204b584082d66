use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::payload::{describe, read_payloads};

/// POST each payload to `<api_base>/receive-post`, stopping at the first
/// rejection. Returns the server acknowledgements in order.
pub async fn run(api_base: &str, api_key: &str, file: &Path) -> Result<Vec<Value>> {
    let payloads = read_payloads(file)?;
    let endpoint = format!("{}/receive-post", api_base.trim_end_matches('/'));
    let client = reqwest::Client::new();

    let mut acks = Vec::with_capacity(payloads.len());
    for (index, payload) in payloads.iter().enumerate() {
        let label = describe(payload, index);
        let response = client
            .post(&endpoint)
            .header("x-api-key", api_key)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("failed to send payload {label} to {endpoint}"))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            bail!("server rejected payload {label}: HTTP {status}: {body}");
        }

        let ack: Value = serde_json::from_str(&body)
            .with_context(|| format!("server returned non-JSON acknowledgement for {label}"))?;
        tracing::info!("Pushed payload {label}");
        acks.push(ack);
    }

    Ok(acks)
}
