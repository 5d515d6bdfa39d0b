use thiserror::Error;

/// exm統一エラー型
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream error: {url} (status: {status})")]
    Upstream {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MirrorError>;

impl MirrorError {
    /// リトライ可能なエラーかどうか
    pub fn is_retryable(&self) -> bool {
        match self {
            MirrorError::Network(_) => true,
            MirrorError::Upstream { status, .. } => {
                // 5xx エラーはリトライ可能
                *status >= 500 && *status < 600
            }
            _ => false,
        }
    }
}
