use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::Article;
use crate::store::ArticleStore;

/// Reconciles a freshly fetched batch with the cache.
///
/// The one correctness property here: a favorite can only change via an
/// explicit user toggle, never as a side effect of a content refresh.
/// The store's conditional upsert enforces that atomically; this layer
/// cleans the batch, stamps timestamps, and reads the persisted rows
/// back so the caller displays stored ids and surviving favorite flags.
pub struct Synchronizer {
    store: Arc<ArticleStore>,
}

impl Synchronizer {
    pub fn new(store: Arc<ArticleStore>) -> Self {
        Self { store }
    }

    pub async fn reconcile(&self, mut fetched: Vec<Article>) -> Result<Vec<Article>> {
        let before = fetched.len();
        fetched.retain(|a| !a.url.is_empty());
        if fetched.len() < before {
            debug!("Dropped {} articles without a URL", before - fetched.len());
        }

        let now = Utc::now().timestamp_millis();
        for article in &mut fetched {
            if article.timestamp == 0 {
                article.timestamp = now;
            }
        }

        self.store.upsert_many(&fetched).await?;

        let mut reconciled = Vec::with_capacity(fetched.len());
        for article in fetched {
            match self.store.get_by_url(&article.url).await? {
                Some(stored) => reconciled.push(stored),
                None => reconciled.push(article),
            }
        }

        info!("Reconciled {} articles with cache", reconciled.len());
        Ok(reconciled)
    }
}
