use std::path::Path;

use affiliate_shared::store::{open_store, StoreConfig};
use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::payload::{describe, read_payloads};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IngestedPost {
    pub id: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct IngestSummary {
    pub saved: Vec<IngestedPost>,
}

/// Validate every payload in `file` before writing any of them, then upsert
/// them in file order.
pub async fn run(config: &StoreConfig, file: &Path) -> Result<IngestSummary> {
    let payloads = read_payloads(file)?;
    if payloads.is_empty() {
        bail!("{} contains no payloads", file.display());
    }

    let posts = payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| {
            let label = describe(&payload, index);
            payload
                .validate()
                .with_context(|| format!("payload {label} is invalid"))
        })
        .collect::<Result<Vec<_>>>()?;

    let store = open_store(config).await?;
    let mut saved = Vec::with_capacity(posts.len());
    for post in &posts {
        let stored = store
            .upsert_post(post)
            .await
            .with_context(|| format!("failed to save post {}", post.id))?;
        tracing::info!("Saved post {} ({})", stored.id, stored.slug);
        saved.push(IngestedPost {
            id: stored.id,
            slug: stored.slug,
        });
    }

    Ok(IngestSummary {
        saved,
    })
}
