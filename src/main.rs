//! movienews - a small movie news blog core

use std::path::Path;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movienews::{config::Config, ingest, repository::MemoryRepository, repository::MovieRepository};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movienews=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting movienews...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!(data_path = %config.data.path.display(), "Configuration loaded");

    // Load the dataset into the in-memory repository
    let mut repo = MemoryRepository::new();
    ingest::populate(&config.data, &mut repo)?;

    tracing::info!(
        articles = repo.get_number_of_articles(),
        tags = repo.get_tags().len(),
        comments = repo.get_comments().len(),
        "Repository populated"
    );

    if let (Some(first), Some(last)) = (repo.get_first_article(), repo.get_last_article()) {
        tracing::info!(from = %first.date, to = %last.date, "Article timeline");
    }

    Ok(())
}
