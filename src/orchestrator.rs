use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::category::infer_category;
use crate::client::FeedClient;
use crate::error::Result;
use crate::models::{Article, FilterChip};
use crate::store::ArticleStore;
use crate::sync::Synchronizer;

/// Synchronous capability check consumed before attempting the network.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Default probe for environments without a platform connectivity API:
/// always try the network and let the transport error drive fallback.
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// What a load produced.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Live fetch, reconciled through the cache.
    Fresh(Vec<Article>),
    /// Cache fallback, with a user-facing notice explaining why.
    Cached {
        articles: Vec<Article>,
        notice: String,
    },
    /// A newer load was issued while this one was in flight; the result
    /// was discarded.
    Superseded,
}

/// Chooses between live fetch and cached fallback, and routes fetched
/// data through the synchronizer.
pub struct FetchOrchestrator {
    client: FeedClient,
    store: Arc<ArticleStore>,
    sync: Synchronizer,
    connectivity: Arc<dyn Connectivity>,
    page_size: u32,
    generation: AtomicU64,
}

impl FetchOrchestrator {
    pub fn new(
        client: FeedClient,
        store: Arc<ArticleStore>,
        connectivity: Arc<dyn Connectivity>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            sync: Synchronizer::new(store.clone()),
            store,
            connectivity,
            page_size,
            generation: AtomicU64::new(0),
        }
    }

    /// Invalidate any in-flight load; its result will be discarded when
    /// it completes.
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Load headlines for the given filter chip: live when possible,
    /// cached (client-side category match) otherwise.
    pub async fn load(&self, filter: &FilterChip) -> Result<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.connectivity.is_online() {
            info!(filter = %filter.name, "Offline, reading cache directly");
            return self
                .cached_by_category(filter, generation, "Offline - showing saved articles")
                .await;
        }

        let country = filter.country.as_deref().unwrap_or("us");
        let fetched = self
            .client
            .top_headlines(country, filter.category.as_deref(), self.page_size, 1)
            .await;

        match fetched {
            Ok(articles) => {
                if self.superseded(generation) {
                    return Ok(LoadOutcome::Superseded);
                }
                let reconciled = self.sync.reconcile(articles).await?;
                if self.superseded(generation) {
                    return Ok(LoadOutcome::Superseded);
                }
                info!(filter = %filter.name, count = reconciled.len(), "Loaded live headlines");
                Ok(LoadOutcome::Fresh(reconciled))
            }
            Err(err) => {
                warn!(filter = %filter.name, error = %err, "Fetch failed, falling back to cache");
                if self.superseded(generation) {
                    return Ok(LoadOutcome::Superseded);
                }
                let notice = err.user_notice();
                self.cached_by_category(filter, generation, &notice).await
            }
        }
    }

    /// Search the feed, falling back to a cache substring search.
    /// Callers route empty queries to [`FetchOrchestrator::load`].
    pub async fn search(&self, query: &str) -> Result<LoadOutcome> {
        debug_assert!(!query.is_empty(), "empty search routes to load");
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if self.connectivity.is_online() {
            match self.client.search(query, "publishedAt", self.page_size, 1).await {
                Ok(articles) => {
                    if self.superseded(generation) {
                        return Ok(LoadOutcome::Superseded);
                    }
                    let reconciled = self.sync.reconcile(articles).await?;
                    if self.superseded(generation) {
                        return Ok(LoadOutcome::Superseded);
                    }
                    return Ok(LoadOutcome::Fresh(reconciled));
                }
                Err(err) => {
                    warn!(query, error = %err, "Search failed, falling back to cache");
                    if self.superseded(generation) {
                        return Ok(LoadOutcome::Superseded);
                    }
                    let articles = self.store.search(query).await?;
                    if self.superseded(generation) {
                        return Ok(LoadOutcome::Superseded);
                    }
                    return Ok(LoadOutcome::Cached {
                        articles,
                        notice: err.user_notice(),
                    });
                }
            }
        }

        let articles = self.store.search(query).await?;
        if self.superseded(generation) {
            return Ok(LoadOutcome::Superseded);
        }
        Ok(LoadOutcome::Cached {
            articles,
            notice: "Offline - showing saved articles".to_string(),
        })
    }

    /// Read-only favorites view, always served from the store.
    pub async fn favorites(&self) -> Result<Vec<Article>> {
        self.store.get_favorites().await
    }

    async fn cached_by_category(
        &self,
        filter: &FilterChip,
        generation: u64,
        notice: &str,
    ) -> Result<LoadOutcome> {
        let mut articles = self.store.get_all().await?;
        if self.superseded(generation) {
            return Ok(LoadOutcome::Superseded);
        }

        // No network round trip is possible, so the category filter is
        // approximated client-side with the keyword tables.
        if let Some(category) = filter.category.as_deref() {
            articles.retain(|a| {
                infer_category(
                    a.title.as_deref(),
                    a.description.as_deref(),
                    a.source_name.as_deref(),
                )
                .map(|label| label.eq_ignore_ascii_case(category))
                .unwrap_or(false)
            });
        }

        Ok(LoadOutcome::Cached {
            articles,
            notice: notice.to_string(),
        })
    }

    fn superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}
