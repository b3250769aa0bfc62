use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;
use crate::database::ContentStore;
use crate::external::CacheStats;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub database: &'static str,
    pub cached_items: i64,
    pub catalog: &'static str,
    pub kv_cache: CacheStats,
}

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    // 检查数据库连接
    state.database.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::Internal("Database connection failed".to_string())
    })?;

    let cached_items = state.database.store().count().await?;

    let catalog = if state.catalog_configured {
        "available"
    } else {
        "not_configured"
    };

    Ok(success(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        database: "connected",
        cached_items,
        catalog,
        kv_cache: state.content.cache_stats(),
    }))
}
