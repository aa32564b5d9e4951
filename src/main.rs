mod category;
mod client;
mod config;
mod error;
mod list;
mod models;
mod orchestrator;
mod store;
mod sync;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::category::infer_category;
use crate::client::FeedClient;
use crate::config::Config;
use crate::list::ListState;
use crate::models::{default_chips, Article};
use crate::orchestrator::{AssumeOnline, FetchOrchestrator, LoadOutcome};
use crate::store::ArticleStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headlines=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load("headlines.toml")?;

    // Initialize the article store
    let database_url = std::env::var("DATABASE_URL").unwrap_or(config.database_url.clone());
    let store = ArticleStore::new(&database_url).await?;
    store.initialize().await?;
    let store = Arc::new(store);
    info!(
        cached = store.count(false).await?,
        favorites = store.count(true).await?,
        "Article store ready"
    );

    // Wire the orchestrator; the store is injected, never a global.
    let client = FeedClient::new(config.base_url.clone(), config.api_key.clone());
    let orchestrator = FetchOrchestrator::new(
        client,
        store.clone(),
        Arc::new(AssumeOnline),
        config.page_size,
    );

    let chips = default_chips();
    let active = &chips[0];

    let (mut list, mut events) = ListState::new();

    match orchestrator.load(active).await {
        Ok(LoadOutcome::Fresh(articles)) => list.replace_all(articles),
        Ok(LoadOutcome::Cached { articles, notice }) => {
            warn!("{}", notice);
            list.replace_all(articles);
        }
        Ok(LoadOutcome::Superseded) => unreachable!("no competing loads at startup"),
        Err(err) => {
            warn!(error = %err, "Load failed, presenting empty list");
            list.replace_all(Vec::new());
        }
    }

    while let Ok(event) = events.try_recv() {
        info!(?event, "list event");
    }

    for article in list.articles() {
        print_row(article);
    }

    // Evict stale cache entries; favorites survive.
    let removed = store.delete_non_favorites().await?;
    info!(removed, "Cache eviction complete");

    Ok(())
}

fn print_row(article: &Article) {
    let badge = infer_category(
        article.title.as_deref(),
        article.description.as_deref(),
        article.source_name.as_deref(),
    )
    .map(|label| format!(" [{}]", label))
    .unwrap_or_default();
    let marker = if article.is_favorite { "*" } else { " " };

    println!(
        "{} {}{}  ({})",
        marker,
        article.title.as_deref().unwrap_or("Untitled"),
        badge,
        article.url
    );
}
