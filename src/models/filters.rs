use serde::{Deserialize, Serialize};

use super::content::ContentKind;
use super::genres;
use super::validation::{ParamValidator, ValidationError};

/// 浏览请求的内容类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowseType {
    All,
    Movie,
    Tv,
    Anime,
}

impl BrowseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowseType::All => "all",
            BrowseType::Movie => "movie",
            BrowseType::Tv => "tv",
            BrowseType::Anime => "anime",
        }
    }

    /// 参与本次查询的上游资源类型
    pub fn content_kinds(&self) -> &'static [ContentKind] {
        match self {
            BrowseType::All => &[ContentKind::Movie, ContentKind::Tv],
            BrowseType::Movie => &[ContentKind::Movie],
            BrowseType::Tv | BrowseType::Anime => &[ContentKind::Tv],
        }
    }
}

impl std::str::FromStr for BrowseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(BrowseType::All),
            "movie" => Ok(BrowseType::Movie),
            "tv" => Ok(BrowseType::Tv),
            "anime" => Ok(BrowseType::Anime),
            other => Err(ValidationError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Popular,
    TopRated,
    Newest,
    Trending,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Popular => "popular",
            SortKey::TopRated => "top_rated",
            SortKey::Newest => "newest",
            SortKey::Trending => "trending",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "popular" => Ok(SortKey::Popular),
            "top_rated" => Ok(SortKey::TopRated),
            "newest" => Ok(SortKey::Newest),
            "trending" => Ok(SortKey::Trending),
            other => Err(ValidationError::InvalidSort(other.to_string())),
        }
    }
}

/// `GET /browse` 的原始查询参数，全部按字符串接收以便返回统一的 400
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub sort_by: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

/// 已验证的浏览过滤条件
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseFilterSet {
    pub kind: BrowseType,
    /// 类型名的 slug，按资源类型在查询时解析为 id
    pub genre: Option<String>,
    pub year: Option<u16>,
    pub min_rating: Option<f32>,
    pub sort: SortKey,
    pub language: Option<String>,
    pub page: u32,
}

impl Default for BrowseFilterSet {
    fn default() -> Self {
        Self {
            kind: BrowseType::All,
            genre: None,
            year: None,
            min_rating: None,
            sort: SortKey::Popular,
            language: None,
            page: 1,
        }
    }
}

impl BrowseFilterSet {
    pub fn from_params(params: &BrowseParams) -> Result<Self, ValidationError> {
        let kind: BrowseType = params.kind.as_deref().unwrap_or("all").parse()?;
        let sort: SortKey = params.sort_by.as_deref().unwrap_or("popular").parse()?;

        let genre = if ParamValidator::is_unset(params.genre.as_deref()) {
            None
        } else {
            let raw = params.genre.as_deref().unwrap_or_default();
            let slug = genres::slugify(raw);
            // 至少在一种参与查询的资源类型里能找到
            let known = kind
                .content_kinds()
                .iter()
                .any(|k| genres::genre_id(*k, &slug).is_some());
            if !known {
                return Err(ValidationError::InvalidGenre(raw.trim().to_string()));
            }
            Some(slug)
        };

        Ok(Self {
            kind,
            genre,
            year: ParamValidator::parse_year(params.year.as_deref())?,
            min_rating: ParamValidator::parse_rating(params.rating.as_deref())?,
            sort,
            language: ParamValidator::parse_language(params.language.as_deref())?,
            page: ParamValidator::parse_page(params.page.as_deref())?,
        })
    }

    /// genre / year / rating / language 任一不是 `all`
    pub fn has_active_filters(&self) -> bool {
        self.genre.is_some()
            || self.year.is_some()
            || self.min_rating.is_some()
            || self.language.is_some()
    }

    pub fn genre_id_for(&self, kind: ContentKind) -> Option<u32> {
        self.genre
            .as_deref()
            .and_then(|slug| genres::genre_id(kind, slug))
    }

    pub fn applied(&self) -> AppliedFilters {
        fn or_all<T: ToString>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "all".to_string())
        }

        AppliedFilters {
            kind: self.kind.as_str().to_string(),
            genre: or_all(&self.genre),
            year: or_all(&self.year),
            rating: or_all(&self.min_rating),
            sort_by: self.sort.as_str().to_string(),
            language: or_all(&self.language),
        }
    }
}

/// 回显给前端的过滤条件
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    #[serde(rename = "type")]
    pub kind: String,
    pub genre: String,
    pub year: String,
    pub rating: String,
    pub sort_by: String,
    pub language: String,
}

/// `GET /search` 的原始查询参数
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub kind: BrowseType,
    pub page: u32,
}

/// 搜索词最短长度，低于该长度的 browse 请求不会跳转
pub const MIN_SEARCH_LEN: usize = 2;

impl SearchQuery {
    pub fn from_params(params: &SearchParams) -> Result<Self, ValidationError> {
        let query = params.q.as_deref().unwrap_or_default().trim().to_string();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Err(ValidationError::QueryTooShort);
        }

        Ok(Self {
            query,
            kind: params.kind.as_deref().unwrap_or("all").parse()?,
            page: ParamValidator::parse_page(params.page.as_deref())?,
        })
    }
}
