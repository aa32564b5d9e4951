use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Article;

/// Durable keyed storage for cached articles.
///
/// One table, one row per article URL. Refresh writes go through
/// [`ArticleStore::upsert`], whose conflict clause deliberately leaves
/// `is_favorite` alone, so a favorite can only change via
/// [`ArticleStore::set_favorite`]. This makes the favorite-preserving
/// merge a single atomic statement instead of a read-then-write pair.
pub struct ArticleStore {
    pool: SqlitePool,
}

impl ArticleStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL UNIQUE,
                title TEXT,
                description TEXT,
                content TEXT,
                author TEXT,
                image_url TEXT,
                published_at TEXT,
                source_id TEXT,
                source_name TEXT,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                timestamp INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_articles_timestamp
            ON articles(timestamp DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            "SELECT * FROM articles ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    pub async fn get_favorites(&self) -> Result<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM articles
            WHERE is_favorite = 1
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    /// Case-insensitive substring match on title or description.
    /// Callers route empty queries to [`ArticleStore::get_all`] instead.
    pub async fn search(&self, query: &str) -> Result<Vec<Article>> {
        debug_assert!(!query.is_empty(), "empty search routes to get_all");

        let pattern = format!("%{}%", query);
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM articles
            WHERE title LIKE ? OR description LIKE ?
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    /// A miss is not an error, it means "treat as new record".
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Article>> {
        let article =
            sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE url = ? LIMIT 1")
                .bind(url)
                .fetch_optional(&self.pool)
                .await?;
        Ok(article)
    }

    /// Insert, or refresh every content column of the existing row.
    /// `is_favorite` is intentionally absent from the update list: a
    /// refresh must never flip it.
    pub async fn upsert(&self, article: &Article) -> Result<()> {
        sqlx::query(UPSERT_SQL)
            .bind(&article.url)
            .bind(&article.title)
            .bind(&article.description)
            .bind(&article.content)
            .bind(&article.author)
            .bind(&article.image_url)
            .bind(&article.published_at)
            .bind(&article.source_id)
            .bind(&article.source_name)
            .bind(article.is_favorite)
            .bind(article.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Same semantics as [`ArticleStore::upsert`], all-or-nothing.
    pub async fn upsert_many(&self, articles: &[Article]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for article in articles {
            sqlx::query(UPSERT_SQL)
                .bind(&article.url)
                .bind(&article.title)
                .bind(&article.description)
                .bind(&article.content)
                .bind(&article.author)
                .bind(&article.image_url)
                .bind(&article.published_at)
                .bind(&article.source_id)
                .bind(&article.source_name)
                .bind(article.is_favorite)
                .bind(article.timestamp)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Update only the favorite flag. Returns whether a row was affected
    /// so the caller can tell "toggled" from "never cached".
    pub async fn set_favorite(&self, url: &str, value: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE articles SET is_favorite = ? WHERE url = ?")
            .bind(value)
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, url: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE url = ?")
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cache eviction: favorites survive unconditionally.
    pub async fn delete_non_favorites(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE is_favorite = 0")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self, favorites_only: bool) -> Result<i64> {
        let sql = if favorites_only {
            "SELECT COUNT(*) FROM articles WHERE is_favorite = 1"
        } else {
            "SELECT COUNT(*) FROM articles"
        };
        let count: (i64,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(count.0)
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO articles (
        url, title, description, content, author,
        image_url, published_at, source_id, source_name,
        is_favorite, timestamp
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(url) DO UPDATE SET
        title = excluded.title,
        description = excluded.description,
        content = excluded.content,
        author = excluded.author,
        image_url = excluded.image_url,
        published_at = excluded.published_at,
        source_id = excluded.source_id,
        source_name = excluded.source_name,
        timestamp = excluded.timestamp
"#;
