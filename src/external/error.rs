use thiserror::Error;

/// 上游目录 API 调用错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TMDB API key not configured")]
    NotConfigured,

    #[error("upstream resource not found")]
    NotFound,

    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("TMDB API error: status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl CatalogError {
    /// 按上游 HTTP 状态码分类
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => CatalogError::NotFound,
            429 => CatalogError::RateLimited,
            _ => CatalogError::Status { status, message },
        }
    }

    /// 已知的上游状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::NotFound => Some(404),
            CatalogError::RateLimited => Some(429),
            CatalogError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if let Some(status) = err.status() {
            CatalogError::from_status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}
