use std::{fs, path::Path};

use affiliate_shared::ReceivePostPayload;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadFile {
    Many(Vec<ReceivePostPayload>),
    One(ReceivePostPayload),
}

/// Read a JSON file holding either one webhook payload or an array of them.
pub fn read_payloads(path: &Path) -> Result<Vec<ReceivePostPayload>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read payload file {}", path.display()))?;
    parse_payloads(&raw).with_context(|| format!("invalid payload JSON in {}", path.display()))
}

pub fn parse_payloads(raw: &str) -> Result<Vec<ReceivePostPayload>> {
    let parsed: PayloadFile = serde_json::from_str(raw)?;
    Ok(match parsed {
        PayloadFile::Many(payloads) => payloads,
        PayloadFile::One(payload) => vec![payload],
    })
}

/// Label used in log lines and error messages for a payload that may not have
/// an id yet.
pub fn describe(payload: &ReceivePostPayload, index: usize) -> String {
    match (&payload.id, &payload.title) {
        (Some(id), Some(title)) => format!("#{index} ({id}: {title})"),
        (Some(id), None) => format!("#{index} ({id})"),
        _ => format!("#{index}"),
    }
}
