use thiserror::Error;

#[derive(Error, Debug)]
pub enum CccTvError {
    /// Page, search or subtitle request failed at the network boundary
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("no playable video for '{0}'")]
    NoPlayableMedia(String),

    /// An async completion arrived after its originating state was torn down
    #[error("stale completion for generation {0}")]
    StaleCallback(u64),

    #[error("key-value store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid key script: {0}")]
    KeyScript(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CccTvError {
    /// Whether this error came from a network boundary and should be shown inline
    pub fn is_fetch(&self) -> bool {
        matches!(self, CccTvError::Fetch(_) | CccTvError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, CccTvError>;
