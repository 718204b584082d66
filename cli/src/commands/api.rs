use affiliate_shared::store::{open_store, StoreConfig};
use anyhow::{bail, Result};

use super::print_json;
use crate::cli::ApiCommands;

pub async fn run(config: &StoreConfig, command: ApiCommands) -> Result<()> {
    let store = open_store(config).await?;

    match command {
        ApiCommands::ListPosts => print_json(&store.list_published_posts().await?),
        ApiCommands::GetPost {
            slug,
        } => match store.get_post_by_slug(&slug).await {
            Ok(post) => print_json(&post),
            Err(err) if err.is_not_found() => bail!("post not found: {slug}"),
            Err(err) => Err(err.into()),
        },
        ApiCommands::ListProducts => print_json(&store.list_products().await?),
        ApiCommands::Stats => print_json(&store.stats().await?),
    }
}
