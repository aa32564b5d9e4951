use thiserror::Error;

/// Failure taxonomy for the reader core.
///
/// Transport and upstream errors are recoverable by falling back to the
/// cache; store errors mean the local database itself is unhappy and the
/// caller should keep whatever in-memory state it already has.
#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feed rejected request{}: {message}", .code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    Upstream {
        code: Option<String>,
        message: String,
    },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl Error {
    /// True when the upstream rejection points at our own configuration
    /// (bad or missing API key, rate limit) rather than a server fault.
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::Upstream { code: Some(code), .. } => {
                code.starts_with("apiKey") || code.as_str() == "rateLimited"
            }
            _ => false,
        }
    }

    /// Short human-readable notice for the UI shell.
    pub fn user_notice(&self) -> String {
        match self {
            Error::Transport(_) => "No connection - showing saved articles".to_string(),
            Error::Upstream { .. } if self.is_configuration() => {
                "News service rejected the API key - check your configuration".to_string()
            }
            Error::Upstream { .. } => "News service unavailable - showing saved articles".to_string(),
            Error::Store(_) => "Saved articles are unavailable right now".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
