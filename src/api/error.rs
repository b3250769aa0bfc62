use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::external::identity::IdentityError;
use crate::external::CatalogError;
use crate::models::{ContentKind, ValidationError};
use crate::services::ServiceError;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// 统一的API错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 请求参数错误
    Validation(String),
    /// 身份校验失败
    Unauthorized(String),
    /// 未找到资源
    NotFound(String),
    /// 上游限流
    RateLimited,
    /// 上游其他错误，状态码已知时透传
    Upstream { status: Option<u16>, message: String },
    /// 依赖未配置
    ServiceUnavailable(String),
    /// 内部服务器错误
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::RateLimited => write!(f, "{}", RATE_LIMIT_MESSAGE),
            ApiError::Upstream { status, message } => match status {
                Some(status) => write!(f, "Upstream error ({}): {}", status, message),
                None => write!(f, "Upstream error: {}", message),
            },
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// 按资源类型给出 404 文案
    pub fn not_found_for(kind: Option<ContentKind>) -> Self {
        let message = match kind {
            Some(ContentKind::Movie) => "Movie not found",
            Some(ContentKind::Tv) => "TV show not found",
            None => "Content not found",
        };
        ApiError::NotFound(message.to_string())
    }

    /// 上游错误分类，404 使用对应类型的文案
    pub fn from_catalog(err: CatalogError, kind: Option<ContentKind>) -> Self {
        match err {
            CatalogError::NotFound => ApiError::not_found_for(kind),
            CatalogError::RateLimited => ApiError::RateLimited,
            CatalogError::NotConfigured => {
                ApiError::ServiceUnavailable("Content catalog is not configured".to_string())
            }
            other => ApiError::Upstream {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }

    pub fn from_service(err: ServiceError, kind: Option<ContentKind>) -> Self {
        match err {
            ServiceError::Validation(e) => e.into(),
            ServiceError::Catalog(e) => ApiError::from_catalog(e, kind),
            ServiceError::Store(e) => ApiError::Internal(format!("content store error: {}", e)),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::from_catalog(err, None)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service(err, None)
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken => ApiError::Unauthorized(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// 从anyhow::Error转换
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// 实现IntoResponse，将错误转换为HTTP响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::RateLimited => {
                tracing::warn!("Upstream rate limit hit");
                RATE_LIMIT_MESSAGE.to_string()
            }
            ApiError::Upstream { status, message } => {
                tracing::error!(upstream_status = ?status, "Upstream error: {}", message);
                "Failed to fetch content from upstream".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
