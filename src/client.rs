use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Article;

/// Thin typed client for the upstream news feed.
///
/// The wire format is the NewsAPI shape: camelCase JSON with a `status`
/// field that reports logical errors even on 2xx responses. Everything
/// past deserialization is opaque display data.
pub struct FeedClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: i64,
    #[serde(default)]
    pub articles: Vec<FeedArticle>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedArticle {
    #[serde(default)]
    pub source: Option<FeedSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl FeedArticle {
    /// Convert to a cache record. Entries without a URL have no business
    /// key and are dropped.
    pub fn into_article(self) -> Option<Article> {
        let url = self.url.filter(|u| !u.is_empty())?;
        let (source_id, source_name) = match self.source {
            Some(s) => (s.id, s.name),
            None => (None, None),
        };

        Some(Article {
            id: 0,
            url,
            title: self.title,
            description: self.description,
            content: self.content,
            author: self.author,
            image_url: self.url_to_image,
            published_at: self.published_at,
            source_id,
            source_name,
            is_favorite: false,
            timestamp: 0,
        })
    }
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Headlines/1.0 (news reader)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn top_headlines(
        &self,
        country: &str,
        category: Option<&str>,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Article>> {
        let mut params = vec![
            ("country".to_string(), country.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
            ("page".to_string(), page.to_string()),
            ("apiKey".to_string(), self.api_key.clone()),
        ];
        if let Some(category) = category {
            params.push(("category".to_string(), category.to_string()));
        }

        info!(country, category, "Fetching top headlines");
        self.fetch("top-headlines", &params).await
    }

    pub async fn search(
        &self,
        query: &str,
        sort_by: &str,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Article>> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("sortBy".to_string(), sort_by.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
            ("page".to_string(), page.to_string()),
            ("apiKey".to_string(), self.api_key.clone()),
        ];

        info!(query, "Searching feed");
        self.fetch("everything", &params).await
    }

    async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> Result<Vec<Article>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(params).send().await?;
        let http_status = response.status();

        // The feed reports logical errors in the body, with or without
        // a 2xx status, so try to decode it either way.
        let body: FeedResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !http_status.is_success() => {
                return Err(Error::Upstream {
                    code: None,
                    message: format!("HTTP {}", http_status),
                });
            }
            Err(err) => return Err(Error::Transport(err)),
        };

        if body.status != "ok" {
            return Err(Error::Upstream {
                code: body.code,
                message: body
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", http_status)),
            });
        }

        let received = body.articles.len();
        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(FeedArticle::into_article)
            .collect();
        if articles.len() < received {
            debug!("Dropped {} feed entries without a URL", received - articles.len());
        }

        Ok(articles)
    }
}
