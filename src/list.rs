use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Article;
use crate::store::ArticleStore;

/// Redraw signals for whoever renders the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// The whole list was swapped; redraw everything.
    ReplacedAll,
    /// A single entry's favorite flag changed; redraw that row.
    UpdatedOne { url: String, is_favorite: bool },
}

/// The currently displayed ordered list of articles.
///
/// Mirrors store state into whatever renders it and pushes user
/// favorite toggles back to the store optimistically: the in-memory
/// flag flips before the write lands and flips back if the write fails.
pub struct ListState {
    articles: Vec<Article>,
    events: mpsc::UnboundedSender<ListEvent>,
}

impl ListState {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ListEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                articles: Vec::new(),
                events: tx,
            },
            rx,
        )
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Atomically swap the displayed list, after a fetch or a store read.
    pub fn replace_all(&mut self, new_list: Vec<Article>) {
        self.articles = new_list;
        self.emit(ListEvent::ReplacedAll);
    }

    /// Mutate one entry's favorite flag, after a background save
    /// confirms. Returns false when the URL is no longer displayed.
    pub fn update_one(&mut self, url: &str, is_favorite: bool) -> bool {
        match self.articles.iter_mut().find(|a| a.url == url) {
            Some(article) => {
                article.is_favorite = is_favorite;
                self.emit(ListEvent::UpdatedOne {
                    url: url.to_string(),
                    is_favorite,
                });
                true
            }
            None => false,
        }
    }

    /// Flip the favorite flag in memory, then persist. On store failure
    /// the flip is reverted and the error returned so the shell can
    /// notify the user. Returns the new flag, or `None` when the URL is
    /// not in the displayed list.
    pub async fn toggle_favorite(
        &mut self,
        url: &str,
        store: &ArticleStore,
    ) -> Result<Option<bool>> {
        let Some(pos) = self.articles.iter().position(|a| a.url == url) else {
            debug!(url, "Favorite toggle for URL not in displayed list");
            return Ok(None);
        };

        let new_value = !self.articles[pos].is_favorite;
        self.articles[pos].is_favorite = new_value;
        self.emit(ListEvent::UpdatedOne {
            url: url.to_string(),
            is_favorite: new_value,
        });

        let persisted = match store.set_favorite(url, new_value).await {
            Ok(true) => Ok(()),
            Ok(false) if new_value => {
                // First favorite of an article the store has never seen:
                // persist the whole displayed record.
                let mut record = self.articles[pos].clone();
                if record.timestamp == 0 {
                    record.timestamp = Utc::now().timestamp_millis();
                }
                store.upsert(&record).await
            }
            // Un-favoriting a row that was never cached needs no write.
            Ok(false) => Ok(()),
            Err(err) => Err(err),
        };

        if let Err(err) = persisted {
            warn!(url, error = %err, "Favorite write failed, reverting");
            self.articles[pos].is_favorite = !new_value;
            self.emit(ListEvent::UpdatedOne {
                url: url.to_string(),
                is_favorite: !new_value,
            });
            return Err(err);
        }

        Ok(Some(new_value))
    }

    fn emit(&self, event: ListEvent) {
        // The renderer may already be torn down; dropped events are fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_store() -> ArticleStore {
        let store = ArticleStore::new("sqlite::memory:").await.unwrap();
        store.initialize().await.unwrap();
        store
    }

    fn displayed_article(url: &str, is_favorite: bool) -> Article {
        Article {
            url: url.to_string(),
            title: Some("Title".to_string()),
            is_favorite,
            timestamp: 100,
            ..Default::default()
        }
    }

    mod replace_all_tests {
        use super::*;

        #[tokio::test]
        async fn test_replace_all_swaps_and_signals() {
            let (mut list, mut rx) = ListState::new();

            list.replace_all(vec![
                displayed_article("https://a.com", false),
                displayed_article("https://b.com", false),
            ]);

            assert_eq!(list.articles().len(), 2);
            assert_eq!(rx.try_recv().unwrap(), ListEvent::ReplacedAll);
        }

        #[tokio::test]
        async fn test_replace_all_with_empty_list() {
            let (mut list, mut rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", false)]);
            let _ = rx.try_recv();

            list.replace_all(Vec::new());
            assert!(list.articles().is_empty());
            assert_eq!(rx.try_recv().unwrap(), ListEvent::ReplacedAll);
        }
    }

    mod update_one_tests {
        use super::*;

        #[tokio::test]
        async fn test_update_one_signals_minimal_redraw() {
            let (mut list, mut rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", false)]);
            let _ = rx.try_recv();

            let found = list.update_one("https://a.com", true);
            assert!(found);
            assert!(list.articles()[0].is_favorite);
            assert_eq!(
                rx.try_recv().unwrap(),
                ListEvent::UpdatedOne {
                    url: "https://a.com".to_string(),
                    is_favorite: true
                }
            );
        }

        #[tokio::test]
        async fn test_update_one_unknown_url() {
            let (mut list, mut rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", false)]);
            let _ = rx.try_recv();

            let found = list.update_one("https://nowhere.com", true);
            assert!(!found);
            assert!(rx.try_recv().is_err());
        }
    }

    mod toggle_tests {
        use super::*;

        #[tokio::test]
        async fn test_toggle_persists_and_flips() {
            let store = create_test_store().await;
            store
                .upsert(&displayed_article("https://a.com", false))
                .await
                .unwrap();

            let (mut list, mut rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", false)]);
            let _ = rx.try_recv();

            let result = list.toggle_favorite("https://a.com", &store).await.unwrap();
            assert_eq!(result, Some(true));
            assert!(list.articles()[0].is_favorite);

            let stored = store.get_by_url("https://a.com").await.unwrap().unwrap();
            assert!(stored.is_favorite);

            assert_eq!(
                rx.try_recv().unwrap(),
                ListEvent::UpdatedOne {
                    url: "https://a.com".to_string(),
                    is_favorite: true
                }
            );
        }

        #[tokio::test]
        async fn test_toggle_back_off() {
            let store = create_test_store().await;
            store
                .upsert(&displayed_article("https://a.com", false))
                .await
                .unwrap();
            store.set_favorite("https://a.com", true).await.unwrap();

            let (mut list, _rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", true)]);

            let result = list.toggle_favorite("https://a.com", &store).await.unwrap();
            assert_eq!(result, Some(false));

            let stored = store.get_by_url("https://a.com").await.unwrap().unwrap();
            assert!(!stored.is_favorite);
        }

        #[tokio::test]
        async fn test_first_favorite_creates_store_row() {
            let store = create_test_store().await;

            let (mut list, _rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", false)]);

            let result = list.toggle_favorite("https://a.com", &store).await.unwrap();
            assert_eq!(result, Some(true));

            let stored = store.get_by_url("https://a.com").await.unwrap().unwrap();
            assert!(stored.is_favorite);
        }

        #[tokio::test]
        async fn test_unfavorite_of_uncached_row_writes_nothing() {
            let store = create_test_store().await;

            // Displayed as favorite, but the store never saw this URL.
            let (mut list, _rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", true)]);

            let result = list.toggle_favorite("https://a.com", &store).await.unwrap();
            assert_eq!(result, Some(false));
            assert!(!list.articles()[0].is_favorite);

            // No phantom non-favorite row was created.
            assert!(store.get_by_url("https://a.com").await.unwrap().is_none());
            assert_eq!(store.count(false).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_toggle_unknown_url_is_noop() {
            let store = create_test_store().await;
            let (mut list, mut rx) = ListState::new();

            let result = list.toggle_favorite("https://nowhere.com", &store).await.unwrap();
            assert_eq!(result, None);
            assert!(rx.try_recv().is_err());
        }

        #[tokio::test]
        async fn test_failed_write_reverts_flag() {
            // Store without an initialized schema: every write fails.
            let broken = ArticleStore::new("sqlite::memory:").await.unwrap();

            let (mut list, mut rx) = ListState::new();
            list.replace_all(vec![displayed_article("https://a.com", false)]);
            let _ = rx.try_recv();

            let result = list.toggle_favorite("https://a.com", &broken).await;
            assert!(result.is_err());

            // Displayed flag is back to its pre-toggle value.
            assert!(!list.articles()[0].is_favorite);

            // Optimistic flip, then the revert.
            assert_eq!(
                rx.try_recv().unwrap(),
                ListEvent::UpdatedOne {
                    url: "https://a.com".to_string(),
                    is_favorite: true
                }
            );
            assert_eq!(
                rx.try_recv().unwrap(),
                ListEvent::UpdatedOne {
                    url: "https://a.com".to_string(),
                    is_favorite: false
                }
            );
        }

        #[tokio::test]
        async fn test_events_dropped_after_renderer_teardown() {
            let store = create_test_store().await;
            let (mut list, rx) = ListState::new();
            drop(rx);

            // Must not panic or error just because nobody is listening.
            list.replace_all(vec![displayed_article("https://a.com", false)]);
            let result = list.toggle_favorite("https://a.com", &store).await.unwrap();
            assert_eq!(result, Some(true));
        }
    }
}
