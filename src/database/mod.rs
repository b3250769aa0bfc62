use sqlx::{sqlite::{SqlitePoolOptions, SqliteConnectOptions}, Pool, Sqlite};
use anyhow::Result;
use std::str::FromStr;

pub mod repository;

pub use repository::{ContentStore, SqliteContentStore};

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
    store: SqliteContentStore,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        // 配置 SQLite 连接选项
        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(30));

        // SQLite 单写入者，限制为1个连接；内存库也依赖同一个连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await?;

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;

        let store = SqliteContentStore::new(pool.clone());
        let count = store.count().await?;
        tracing::info!("Database initialized - cached content items: {}", count);

        Ok(Self { pool, store })
    }

    /// 测试用内存数据库
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub fn store(&self) -> &SqliteContentStore {
        &self.store
    }

    /// 连接检查
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
