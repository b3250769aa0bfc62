//! 将上游电影 / 电视剧条目转换为统一的内部结构
//!
//! 上游两种资源的字段名不同（title / name，release_date / first_air_date），
//! 这里用 [`CatalogItem`] 显式区分，每种类型只有一个转换函数。

use url::Url;

use super::tmdb::{TmdbMovie, TmdbTvShow};
use crate::models::genres::{self, FALLBACK_GENRE};
use crate::models::{ContentItem, ContentKind, NormalizedResult, ResultKind};

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const POSTER_PLACEHOLDER: &str = "/placeholder-poster.jpg";
pub const BACKDROP_PLACEHOLDER: &str = "/placeholder-backdrop.jpg";

/// 列表条目最多展示的类型数
pub const MAX_RESULT_GENRES: usize = 3;

/// 图片尺寸
#[derive(Debug, Clone, Copy)]
pub enum ImageSize {
    W500,
    Original,
}

impl ImageSize {
    fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// 上游条目
#[derive(Debug, Clone)]
pub enum CatalogItem {
    Movie(TmdbMovie),
    Tv(TmdbTvShow),
}

/// 构建图片URL：绝对地址原样返回，相对路径拼接 CDN，缺失时使用本地占位图
pub fn image_url(path: Option<&str>, size: ImageSize, fallback: &str) -> String {
    let path = match path.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return fallback.to_string(),
    };

    if let Ok(url) = Url::parse(path) {
        if matches!(url.scheme(), "http" | "https") {
            return path.to_string();
        }
    }

    if path.starts_with('/') {
        format!("{}/{}{}", IMAGE_BASE_URL, size.as_str(), path)
    } else {
        format!("{}/{}/{}", IMAGE_BASE_URL, size.as_str(), path)
    }
}

pub fn poster_url(path: Option<&str>) -> String {
    image_url(path, ImageSize::W500, POSTER_PLACEHOLDER)
}

pub fn backdrop_url(path: Option<&str>) -> String {
    image_url(path, ImageSize::Original, BACKDROP_PLACEHOLDER)
}

/// 取日期前 4 个字符作为年份；缺失时为 "Unknown"
pub fn year_from_date(date: Option<&str>) -> String {
    match date.map(str::trim) {
        Some(d) if !d.is_empty() => d.chars().take(4).collect(),
        _ => "Unknown".to_string(),
    }
}

pub fn normalize(item: &CatalogItem, tag: ResultKind) -> NormalizedResult {
    match item {
        CatalogItem::Movie(movie) => normalize_movie(movie),
        CatalogItem::Tv(show) => normalize_tv(show, tag),
    }
}

pub fn normalize_movie(movie: &TmdbMovie) -> NormalizedResult {
    NormalizedResult {
        id: movie.id,
        title: movie.title.clone(),
        poster: poster_url(movie.poster_path.as_deref()),
        backdrop: backdrop_url(movie.backdrop_path.as_deref()),
        rating: movie.vote_average.unwrap_or(0.0),
        year: year_from_date(movie.release_date.as_deref()),
        kind: ResultKind::Movie,
        genres: genres::names_for_ids(ContentKind::Movie, &movie.genre_id_list(), MAX_RESULT_GENRES),
    }
}

/// `tag` 为 `Anime` 时仅改变输出标签，字段映射与电视剧相同
pub fn normalize_tv(show: &TmdbTvShow, tag: ResultKind) -> NormalizedResult {
    let kind = match tag {
        ResultKind::Anime => ResultKind::Anime,
        _ => ResultKind::Tv,
    };

    NormalizedResult {
        id: show.id,
        title: show.name.clone(),
        poster: poster_url(show.poster_path.as_deref()),
        backdrop: backdrop_url(show.backdrop_path.as_deref()),
        rating: show.vote_average.unwrap_or(0.0),
        year: year_from_date(show.first_air_date.as_deref()),
        kind,
        genres: genres::names_for_ids(ContentKind::Tv, &show.genre_id_list(), MAX_RESULT_GENRES),
    }
}

fn stored_genres(kind: ContentKind, ids: &[u32], named: &[super::tmdb::TmdbGenre]) -> Vec<String> {
    if !named.is_empty() {
        return named.iter().map(|g| g.name.clone()).collect();
    }
    let names: Vec<String> = ids
        .iter()
        .filter_map(|id| genres::genre_name(kind, *id))
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        vec![FALLBACK_GENRE.to_string()]
    } else {
        names
    }
}

/// 转换为缓存实体，图片保留上游路径片段
pub fn to_content_item(item: &CatalogItem) -> ContentItem {
    match item {
        CatalogItem::Movie(movie) => ContentItem::new(
            movie.id,
            ContentKind::Movie,
            movie.title.clone(),
            movie.overview.clone(),
            movie.poster_path.clone(),
            movie.backdrop_path.clone(),
            movie.release_date.clone(),
            &stored_genres(ContentKind::Movie, &movie.genre_ids, &movie.genres),
            movie.vote_average.unwrap_or(0.0),
        ),
        CatalogItem::Tv(show) => ContentItem::new(
            show.id,
            ContentKind::Tv,
            show.name.clone(),
            show.overview.clone(),
            show.poster_path.clone(),
            show.backdrop_path.clone(),
            show.first_air_date.clone(),
            &stored_genres(ContentKind::Tv, &show.genre_ids, &show.genres),
            show.vote_average.unwrap_or(0.0),
        ),
    }
}
