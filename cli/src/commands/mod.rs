pub mod api;
pub mod ingest;
pub mod init;
pub mod push;

use anyhow::Result;
use serde::Serialize;

use crate::cli::{Cli, Commands};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            store,
        } => init::run(&store.resolve()?).await,
        Commands::Ingest {
            store,
            file,
        } => {
            let summary = ingest::run(&store.resolve()?, &file).await?;
            print_json(&summary)
        },
        Commands::Push {
            file,
            url,
            api_key,
        } => {
            let acks = push::run(&url, &api_key, &file).await?;
            print_json(&acks)
        },
        Commands::Api {
            store,
            command,
        } => api::run(&store.resolve()?, command).await,
        Commands::Slug {
            title,
        } => {
            println!("{}", affiliate_shared::slugify(&title));
            Ok(())
        },
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
