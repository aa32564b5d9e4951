use chrono::Utc;
use sqlx::FromRow;

/// A cached news article.
///
/// `url` is the business key: the store holds at most one row per URL.
/// `id` is the local surrogate key, 0 until the store has assigned one.
/// `is_favorite` only ever changes through an explicit favorite
/// operation, never through a content refresh.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Article {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub source_id: Option<String>,
    pub source_name: Option<String>,
    pub is_favorite: bool,
    /// Insertion/update time in milliseconds since epoch.
    pub timestamp: i64,
}

impl Article {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now().timestamp_millis(),
            ..Default::default()
        }
    }
}

/// A selectable facet narrowing which articles are fetched.
///
/// Transient UI state, never persisted. One chip is selected at a time
/// within a given list.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
    pub name: String,
    pub category: Option<String>,
    pub country: Option<String>,
    pub selected: bool,
}

impl FilterChip {
    pub fn new(
        name: impl Into<String>,
        category: Option<&str>,
        country: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.map(str::to_string),
            country: country.map(str::to_string),
            selected: false,
        }
    }
}

/// The stock chip row: "Latest" plus the standard categories, US edition.
/// The first chip starts out selected.
pub fn default_chips() -> Vec<FilterChip> {
    let mut chips = vec![
        FilterChip::new("Latest", None, Some("us")),
        FilterChip::new("Business", Some("business"), Some("us")),
        FilterChip::new("Technology", Some("technology"), Some("us")),
        FilterChip::new("Entertainment", Some("entertainment"), Some("us")),
        FilterChip::new("Sports", Some("sports"), Some("us")),
        FilterChip::new("Health", Some("health"), Some("us")),
    ];
    chips[0].selected = true;
    chips
}
