pub mod cache;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod tmdb;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use cache::{CacheStats, KeyValueCache, MemoryKeyValueCache};
pub use error::CatalogError;
pub use normalize::CatalogItem;
pub use tmdb::{CatalogRequest, TmdbClient, TmdbMovie, TmdbPage, TmdbTvShow, BROWSE_TIMEOUT};

/// 上游目录 API
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch(&self, request: &CatalogRequest) -> Result<Value, CatalogError>;
}

/// 请求并反序列化为具体类型
pub async fn fetch_as<T: DeserializeOwned>(
    api: &dyn CatalogApi,
    request: &CatalogRequest,
) -> Result<T, CatalogError> {
    let value = api.fetch(request).await?;
    Ok(serde_json::from_value(value)?)
}
