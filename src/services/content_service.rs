//! 内容详情与热门列表：本地缓存优先，回源后写回

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use super::error::ServiceError;
use super::upsert_writer::{UpsertReport, UpsertWriter, MAX_CONCURRENT_UPSERTS};
use crate::database::ContentStore;
use crate::external::normalize::{self, CatalogItem};
use crate::external::{fetch_as, CatalogApi, CatalogRequest, KeyValueCache, TmdbMovie, TmdbPage, TmdbTvShow};
use crate::models::{ContentItem, ContentKind, NormalizedResult, ResultKind};

/// 详情缓存有效期
pub const DETAIL_FRESHNESS_DAYS: i64 = 7;

/// 热门电影键值缓存 TTL
pub const TRENDING_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

const TRENDING_MOVIES_KEY: &str = "trending:movie:day";

#[derive(Debug)]
pub struct DetailLookup {
    pub item: ContentItem,
    pub from_cache: bool,
}

#[derive(Debug)]
pub struct TrendingList {
    pub results: Vec<NormalizedResult>,
    pub from_cache: bool,
    /// 后台写入任务；响应路径不等待它
    pub writes: Option<JoinHandle<UpsertReport>>,
}

pub struct ContentService {
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn ContentStore>,
    kv: Arc<dyn KeyValueCache>,
    writer: UpsertWriter,
    freshness: chrono::Duration,
}

impl ContentService {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn ContentStore>,
        kv: Arc<dyn KeyValueCache>,
    ) -> Self {
        let writer = UpsertWriter::new(store.clone(), MAX_CONCURRENT_UPSERTS);
        Self {
            catalog,
            store,
            kv,
            writer,
            freshness: chrono::Duration::days(DETAIL_FRESHNESS_DAYS),
        }
    }

    /// 获取详情：缓存新鲜时直接返回，否则回源一次并写回
    pub async fn get_or_fetch_detail(
        &self,
        kind: ContentKind,
        external_id: i64,
    ) -> Result<DetailLookup, ServiceError> {
        let cached = self
            .store
            .find(external_id, kind)
            .await
            .map_err(ServiceError::Store)?;

        if let Some(item) = cached {
            if item.is_fresh(Utc::now(), self.freshness) {
                tracing::debug!("Cache hit for {} details: {}", kind, external_id);
                return Ok(DetailLookup {
                    item,
                    from_cache: true,
                });
            }
            tracing::debug!("Stale {} details, refetching: {}", kind, external_id);
        }

        let request = CatalogRequest::new(format!("/{}/{}", kind, external_id));
        let upstream = match kind {
            ContentKind::Movie => {
                CatalogItem::Movie(fetch_as::<TmdbMovie>(self.catalog.as_ref(), &request).await?)
            }
            ContentKind::Tv => {
                CatalogItem::Tv(fetch_as::<TmdbTvShow>(self.catalog.as_ref(), &request).await?)
            }
        };

        // 详情必须落库后才返回，写入失败向上报告
        let item = normalize::to_content_item(&upstream);
        self.store.upsert(&item).await.map_err(|e| {
            tracing::error!(
                external_id,
                kind = %kind,
                error = %e,
                "Failed to persist fetched details"
            );
            ServiceError::Store(e)
        })?;

        Ok(DetailLookup {
            item,
            from_cache: false,
        })
    }

    /// 当日热门列表；电影额外经过 1 小时的键值缓存
    pub async fn trending(&self, kind: ContentKind) -> Result<TrendingList, ServiceError> {
        if kind == ContentKind::Movie {
            if let Some(blob) = self.kv.get(TRENDING_MOVIES_KEY).await {
                match serde_json::from_str::<Vec<NormalizedResult>>(&blob) {
                    Ok(results) => {
                        return Ok(TrendingList {
                            results,
                            from_cache: true,
                            writes: None,
                        })
                    }
                    Err(e) => {
                        tracing::warn!("Discarding unreadable trending cache entry: {}", e);
                        self.kv.remove(TRENDING_MOVIES_KEY).await;
                    }
                }
            }
        }

        let request = CatalogRequest::new(format!("/trending/{}/day", kind));
        let items: Vec<CatalogItem> = match kind {
            ContentKind::Movie => fetch_as::<TmdbPage<TmdbMovie>>(self.catalog.as_ref(), &request)
                .await?
                .results
                .into_iter()
                .map(CatalogItem::Movie)
                .collect(),
            ContentKind::Tv => fetch_as::<TmdbPage<TmdbTvShow>>(self.catalog.as_ref(), &request)
                .await?
                .results
                .into_iter()
                .map(CatalogItem::Tv)
                .collect(),
        };

        let results: Vec<NormalizedResult> = items
            .iter()
            .map(|item| normalize::normalize(item, ResultKind::from(kind)))
            .collect();

        let writes = self
            .writer
            .dispatch(items.iter().map(normalize::to_content_item).collect());

        if kind == ContentKind::Movie {
            match serde_json::to_string(&results) {
                Ok(blob) => self.kv.set(TRENDING_MOVIES_KEY, blob, TRENDING_CACHE_TTL).await,
                Err(e) => tracing::warn!("Failed to serialize trending movies for cache: {}", e),
            }
        }

        Ok(TrendingList {
            results,
            from_cache: false,
            writes: Some(writes),
        })
    }

    pub fn cache_stats(&self) -> crate::external::CacheStats {
        self.kv.stats()
    }
}
