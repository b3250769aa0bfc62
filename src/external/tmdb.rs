use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CatalogError;
use super::CatalogApi;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// 浏览、搜索类请求的固定超时
pub const BROWSE_TIMEOUT: Duration = Duration::from_secs(5);

/// 一次上游调用：端点路径 + 查询参数（api_key / language 由客户端注入）
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl CatalogRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
            timeout: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn page(self, page: u32) -> Self {
        self.param("page", page)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// TMDB API客户端
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch(&self, request: &CatalogRequest) -> Result<Value, CatalogError> {
        let api_key = self.api_key.as_ref().ok_or(CatalogError::NotConfigured)?;
        let url = format!("{}{}", self.base_url, request.endpoint);

        let mut builder = self
            .client
            .get(&url)
            .query(&[("api_key", api_key.as_str()), ("language", self.language.as_str())])
            .query(&request.params);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!("TMDB GET {} {:?}", request.endpoint, request.params);
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::from_status(status.as_u16(), message));
        }

        Ok(response.json::<Value>().await?)
    }
}

/// TMDB分页响应
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// TMDB类型
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

/// TMDB电影；列表接口带 genre_ids，详情接口带 genres
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

/// TMDB电视剧
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TmdbTvShow {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

fn collect_genre_ids(ids: &[u32], genres: &[TmdbGenre]) -> Vec<u32> {
    if ids.is_empty() {
        genres.iter().map(|g| g.id).collect()
    } else {
        ids.to_vec()
    }
}

impl TmdbMovie {
    pub fn genre_id_list(&self) -> Vec<u32> {
        collect_genre_ids(&self.genre_ids, &self.genres)
    }
}

impl TmdbTvShow {
    pub fn genre_id_list(&self) -> Vec<u32> {
        collect_genre_ids(&self.genre_ids, &self.genres)
    }

    /// 动画类型且产地为日本
    pub fn is_anime(&self) -> bool {
        self.genre_id_list().contains(&crate::models::genres::ANIMATION_GENRE_ID)
            && self.origin_country.iter().any(|c| c.eq_ignore_ascii_case("JP"))
    }
}
