use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use anyhow::Result;

use crate::models::{ContentItem, ContentKind};

/// 内容缓存仓库接口
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find(&self, external_id: i64, kind: ContentKind) -> Result<Option<ContentItem>>;
    /// 按 (external_id, kind) 插入或覆盖，后写入者生效
    async fn upsert(&self, item: &ContentItem) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

/// SQLite 内容仓库实现
#[derive(Clone)]
pub struct SqliteContentStore {
    pool: Pool<Sqlite>,
}

impl SqliteContentStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn find(&self, external_id: i64, kind: ContentKind) -> Result<Option<ContentItem>> {
        let item = sqlx::query_as::<_, ContentItem>(
            "SELECT * FROM content_items WHERE external_id = ? AND kind = ?"
        )
        .bind(external_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn upsert(&self, item: &ContentItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO content_items (
                external_id, kind, title, overview, poster_path, backdrop_path,
                release_date, genres, rating, last_fetched
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(external_id, kind) DO UPDATE SET
                title = excluded.title,
                overview = excluded.overview,
                poster_path = excluded.poster_path,
                backdrop_path = excluded.backdrop_path,
                release_date = excluded.release_date,
                genres = excluded.genres,
                rating = excluded.rating,
                last_fetched = excluded.last_fetched
            "#
        )
        .bind(item.external_id)
        .bind(&item.kind)
        .bind(&item.title)
        .bind(&item.overview)
        .bind(&item.poster_path)
        .bind(&item.backdrop_path)
        .bind(&item.release_date)
        .bind(&item.genres)
        .bind(item.rating)
        .bind(item.last_fetched)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
