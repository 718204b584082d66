use affiliate_shared::store::{open_store, StoreConfig};
use anyhow::Result;

pub async fn run(config: &StoreConfig) -> Result<()> {
    let store = open_store(config).await?;
    let stats = store.stats().await?;
    tracing::info!(
        "Schema ready on {} ({} posts, {} products)",
        config,
        stats.posts,
        stats.products
    );
    Ok(())
}
