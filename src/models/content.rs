use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::ValidationError;

/// 本地缓存中的内容类型，与上游的两种资源一一对应
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Tv,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Tv => "tv",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(ContentKind::Movie),
            "tv" => Ok(ContentKind::Tv),
            other => Err(ValidationError::InvalidContentKind(other.to_string())),
        }
    }
}

/// 归一化结果上的类型标签；动漫在上游是电视剧，但对外单独标记
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Movie,
    Tv,
    Anime,
}

impl ResultKind {
    /// 上游实际的资源类型
    pub fn content_kind(&self) -> ContentKind {
        match self {
            ResultKind::Movie => ContentKind::Movie,
            ResultKind::Tv | ResultKind::Anime => ContentKind::Tv,
        }
    }
}

impl From<ContentKind> for ResultKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Movie => ResultKind::Movie,
            ContentKind::Tv => ResultKind::Tv,
        }
    }
}

/// 缓存的内容条目，(external_id, kind) 唯一
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct ContentItem {
    pub external_id: i64,
    pub kind: String,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub genres: String, // JSON array as string
    pub rating: f64,
    pub last_fetched: DateTime<Utc>,
}

impl ContentItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        external_id: i64,
        kind: ContentKind,
        title: String,
        overview: Option<String>,
        poster_path: Option<String>,
        backdrop_path: Option<String>,
        release_date: Option<String>,
        genres: &[String],
        rating: f64,
    ) -> Self {
        Self {
            external_id,
            kind: kind.to_string(),
            title,
            overview,
            poster_path,
            backdrop_path,
            release_date,
            genres: serde_json::to_string(genres).unwrap_or_else(|_| "[]".to_string()),
            rating,
            last_fetched: Utc::now(),
        }
    }

    pub fn genre_names(&self) -> Vec<String> {
        serde_json::from_str(&self.genres).unwrap_or_default()
    }

    /// `now - last_fetched < max_age`
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.last_fetched) < max_age
    }
}

/// 浏览/搜索列表中的统一条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedResult {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub backdrop: String,
    pub rating: f64,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub genres: Vec<String>,
}
