//! 静态类型表
//!
//! 电影与电视剧的类型 id 在上游是两套表，部分 id 相同含义也相同（16 = Animation），
//! 但也有电视剧独有的合并类型（10759 = Action & Adventure）。这里按类型分开维护，
//! 避免一张扁平表里后写入的名称覆盖先写入的。

use serde::Serialize;

use super::content::ContentKind;

/// 动漫查询强制使用的类型 id
pub const ANIMATION_GENRE_ID: u32 = 16;

/// 上游没有可映射类型时的兜底类型
pub const FALLBACK_GENRE: &str = "Action";

const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

const TV_GENRES: &[(u32, &str)] = &[
    (10759, "Action & Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (10762, "Kids"),
    (9648, "Mystery"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
    (37, "Western"),
];

// 前端使用的单一类型词汇 -> 上游 id
const MOVIE_ALIASES: &[(&str, u32)] = &[("sci-fi", 878), ("scifi", 878)];

const TV_ALIASES: &[(&str, u32)] = &[
    ("action", 10759),
    ("adventure", 10759),
    ("sci-fi", 10765),
    ("scifi", 10765),
    ("science-fiction", 10765),
    ("fantasy", 10765),
    ("war", 10768),
    ("politics", 10768),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

fn table(kind: ContentKind) -> &'static [(u32, &'static str)] {
    match kind {
        ContentKind::Movie => MOVIE_GENRES,
        ContentKind::Tv => TV_GENRES,
    }
}

fn aliases(kind: ContentKind) -> &'static [(&'static str, u32)] {
    match kind {
        ContentKind::Movie => MOVIE_ALIASES,
        ContentKind::Tv => TV_ALIASES,
    }
}

/// "Science Fiction" -> "science-fiction", "Action & Adventure" -> "action-adventure"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn genre_name(kind: ContentKind, id: u32) -> Option<&'static str> {
    table(kind)
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// 按名称（大小写、空格、连字符不敏感）查找类型 id
pub fn genre_id(kind: ContentKind, name: &str) -> Option<u32> {
    let slug = slugify(name);
    if slug.is_empty() {
        return None;
    }

    table(kind)
        .iter()
        .find(|(_, genre)| slugify(genre) == slug)
        .map(|(id, _)| *id)
        .or_else(|| {
            aliases(kind)
                .iter()
                .find(|(alias, _)| *alias == slug)
                .map(|(_, id)| *id)
        })
}

/// 按名称排序的类型列表
pub fn list(kind: ContentKind) -> Vec<Genre> {
    let mut genres: Vec<Genre> = table(kind)
        .iter()
        .map(|(id, name)| Genre {
            id: *id,
            name: name.to_string(),
        })
        .collect();
    genres.sort_by(|a, b| a.name.cmp(&b.name));
    genres
}

/// 将 id 列表映射为最多 `limit` 个名称，全部无法映射时返回兜底类型
pub fn names_for_ids(kind: ContentKind, ids: &[u32], limit: usize) -> Vec<String> {
    let names: Vec<String> = ids
        .iter()
        .filter_map(|id| genre_name(kind, *id))
        .take(limit)
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        vec![FALLBACK_GENRE.to_string()]
    } else {
        names
    }
}
