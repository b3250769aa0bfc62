//! 运行配置：先加载 `.env`，再读取环境变量

use std::net::SocketAddr;

use anyhow::Context;

use crate::external::identity::{IdentityConfig, DEFAULT_ENDPOINT};
use crate::external::tmdb::DEFAULT_BASE_URL;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./catalog.db?mode=rwc";
pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub identity: Option<IdentityConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构造，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT {:?}, falling back to 3000", raw);
                3000
            }),
            None => 3000,
        };

        let identity = get("IDENTITY_API_KEY").map(|api_key| IdentityConfig {
            api_key,
            endpoint: get("IDENTITY_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        });

        Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            tmdb_api_key: get("TMDB_API_KEY"),
            tmdb_base_url: get("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            tmdb_language: get("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            identity,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
