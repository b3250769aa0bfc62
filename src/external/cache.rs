use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};

/// 键值缓存接口：get / 带 TTL 的 set
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
    async fn remove(&self, key: &str);
    fn stats(&self) -> CacheStats;
}

/// 缓存条目，TTL 随条目保存
#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    ttl: Duration,
}

struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// 进程内键值缓存
#[derive(Clone)]
pub struct MemoryKeyValueCache {
    cache: Cache<String, CacheEntry>,
}

impl MemoryKeyValueCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(EntryExpiry)
                .build(),
        }
    }
}

impl Default for MemoryKeyValueCache {
    fn default() -> Self {
        Self::new(1_000)
    }
}

#[async_trait]
impl KeyValueCache for MemoryKeyValueCache {
    async fn get(&self, key: &str) -> Option<String> {
        let hit = self.cache.get(key).await.map(|entry| entry.data);
        if hit.is_some() {
            tracing::debug!("Cache HIT: {}", key);
        } else {
            tracing::debug!("Cache MISS: {}", key);
        }
        hit
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        tracing::debug!("Cache SET: {} (TTL: {:?})", key, ttl);
        self.cache
            .insert(key.to_string(), CacheEntry { data: value, ttl })
            .await;
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub entries: u64,
}
