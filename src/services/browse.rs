//! 浏览与搜索聚合
//!
//! 单一类型时只发一次上游请求；`type=all` 时电影与电视剧并发请求同一页，
//! 再按 电影、电视剧、电影…… 交替合并。

use std::sync::Arc;

use serde::Serialize;

use super::error::ServiceError;
use crate::external::normalize::{self, CatalogItem};
use crate::external::{
    fetch_as, CatalogApi, CatalogError, CatalogRequest, TmdbMovie, TmdbPage, TmdbTvShow,
    BROWSE_TIMEOUT,
};
use crate::models::genres::ANIMATION_GENRE_ID;
use crate::models::{
    BrowseFilterSet, BrowseType, ContentKind, NormalizedResult, ResultKind, SearchQuery, SortKey,
};

/// 合并结果的条数上限
pub const DUAL_RESULT_CAP: usize = 24;

/// 上游可翻到的最大页数
pub const MAX_TOTAL_PAGES: u32 = 500;

const TOP_RATED_MIN_VOTES_MOVIE: u32 = 100;
const TOP_RATED_MIN_VOTES_TV: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePage {
    pub results: Vec<NormalizedResult>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

impl BrowsePage {
    fn empty(page: u32) -> Self {
        Self {
            results: Vec::new(),
            page,
            total_pages: 0,
            total_results: 0,
        }
    }
}

fn apply_sort(request: CatalogRequest, kind: ContentKind, sort: SortKey) -> CatalogRequest {
    match (sort, kind) {
        (SortKey::Popular, _) => request.param("sort_by", "popularity.desc"),
        (SortKey::TopRated, ContentKind::Movie) => request
            .param("sort_by", "vote_average.desc")
            .param("vote_count.gte", TOP_RATED_MIN_VOTES_MOVIE),
        (SortKey::TopRated, ContentKind::Tv) => request
            .param("sort_by", "vote_average.desc")
            .param("vote_count.gte", TOP_RATED_MIN_VOTES_TV),
        (SortKey::Newest, ContentKind::Movie) => request.param("sort_by", "primary_release_date.desc"),
        (SortKey::Newest, ContentKind::Tv) => request.param("sort_by", "first_air_date.desc"),
        (SortKey::Trending, _) => request,
    }
}

/// year / rating / language 映射为 discover 参数；类型由调用方处理
fn apply_filters(mut request: CatalogRequest, kind: ContentKind, filters: &BrowseFilterSet) -> CatalogRequest {
    if let Some(year) = filters.year {
        let key = match kind {
            ContentKind::Movie => "primary_release_year",
            ContentKind::Tv => "first_air_date_year",
        };
        request = request.param(key, year);
    }
    if let Some(rating) = filters.min_rating {
        request = request.param("vote_average.gte", rating);
    }
    if let Some(language) = &filters.language {
        request = request.param("with_original_language", language);
    }
    request
}

/// 按决策表为单一类型选择上游查询。
///
/// 用户选择的类型在该资源类型下不存在时返回 `None`，此时结果为空页，不发请求。
pub fn browse_request(target: ResultKind, filters: &BrowseFilterSet) -> Option<CatalogRequest> {
    let kind = target.content_kind();
    let genre_id = match &filters.genre {
        None => None,
        Some(_) => Some(filters.genre_id_for(kind)?),
    };

    let request = if target == ResultKind::Anime {
        // 动漫 = 日本动画电视剧，用户类型与 16 组合而不是替换
        let mut with_genres = vec![ANIMATION_GENRE_ID.to_string()];
        if let Some(id) = genre_id.filter(|id| *id != ANIMATION_GENRE_ID) {
            with_genres.push(id.to_string());
        }
        let request = CatalogRequest::new("/discover/tv")
            .param("with_genres", with_genres.join(","))
            .param("with_origin_country", "JP");
        apply_filters(apply_sort(request, kind, filters.sort), kind, filters)
    } else if filters.sort == SortKey::Trending {
        CatalogRequest::new(format!("/trending/{}/day", kind))
    } else if !filters.has_active_filters() && filters.sort == SortKey::Popular {
        apply_sort(CatalogRequest::new(format!("/{}/popular", kind)), kind, filters.sort)
    } else if !filters.has_active_filters() && filters.sort == SortKey::TopRated {
        apply_sort(CatalogRequest::new(format!("/{}/top_rated", kind)), kind, filters.sort)
    } else {
        let mut request = apply_sort(CatalogRequest::new(format!("/discover/{}", kind)), kind, filters.sort);
        if let Some(id) = genre_id {
            request = request.param("with_genres", id);
        }
        apply_filters(request, kind, filters)
    };

    Some(request.page(filters.page).with_timeout(BROWSE_TIMEOUT))
}

/// 严格交替合并，先取 `first`；一侧耗尽后另一侧继续填充，总数不超过 `cap`
pub fn interleave<T>(first: Vec<T>, second: Vec<T>, cap: usize) -> Vec<T> {
    let mut merged = Vec::with_capacity(cap.min(first.len() + second.len()));
    let mut a = first.into_iter();
    let mut b = second.into_iter();

    while merged.len() < cap {
        let (x, y) = (a.next(), b.next());
        if x.is_none() && y.is_none() {
            break;
        }
        if let Some(x) = x {
            merged.push(x);
        }
        if merged.len() < cap {
            if let Some(y) = y {
                merged.push(y);
            }
        }
    }
    merged
}

fn merge_pages(movies: BrowsePage, tv: BrowsePage, page: u32) -> BrowsePage {
    BrowsePage {
        results: interleave(movies.results, tv.results, DUAL_RESULT_CAP),
        page,
        total_pages: movies.total_pages.max(tv.total_pages),
        total_results: movies.total_results.saturating_add(tv.total_results),
    }
}

pub struct BrowseAggregator {
    catalog: Arc<dyn CatalogApi>,
}

impl BrowseAggregator {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }

    pub async fn browse(&self, filters: &BrowseFilterSet) -> Result<BrowsePage, ServiceError> {
        let page = match filters.kind {
            BrowseType::All => {
                let (movies, tv) = tokio::try_join!(
                    self.browse_single(ResultKind::Movie, filters),
                    self.browse_single(ResultKind::Tv, filters),
                )?;
                merge_pages(movies, tv, filters.page)
            }
            BrowseType::Movie => self.browse_single(ResultKind::Movie, filters).await?,
            BrowseType::Tv => self.browse_single(ResultKind::Tv, filters).await?,
            BrowseType::Anime => self.browse_single(ResultKind::Anime, filters).await?,
        };
        Ok(page)
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<BrowsePage, ServiceError> {
        let page = match query.kind {
            BrowseType::All => {
                let (movies, tv) = tokio::try_join!(
                    self.search_single(ResultKind::Movie, query),
                    self.search_single(ResultKind::Tv, query),
                )?;
                merge_pages(movies, tv, query.page)
            }
            BrowseType::Movie => self.search_single(ResultKind::Movie, query).await?,
            BrowseType::Tv => self.search_single(ResultKind::Tv, query).await?,
            BrowseType::Anime => self.search_single(ResultKind::Anime, query).await?,
        };
        Ok(page)
    }

    async fn browse_single(
        &self,
        target: ResultKind,
        filters: &BrowseFilterSet,
    ) -> Result<BrowsePage, CatalogError> {
        match browse_request(target, filters) {
            Some(request) => self.fetch_page(&request, target, filters.page, |_| true).await,
            None => {
                tracing::debug!("Genre {:?} has no {} mapping, returning empty page", filters.genre, target.content_kind());
                Ok(BrowsePage::empty(filters.page))
            }
        }
    }

    async fn search_single(
        &self,
        target: ResultKind,
        query: &SearchQuery,
    ) -> Result<BrowsePage, CatalogError> {
        let request = CatalogRequest::new(format!("/search/{}", target.content_kind()))
            .param("query", &query.query)
            .param("include_adult", "false")
            .page(query.page)
            .with_timeout(BROWSE_TIMEOUT);

        // 搜索接口没有产地 / 类型过滤，动漫在结果上筛选
        let keep = |item: &CatalogItem| match (target, item) {
            (ResultKind::Anime, CatalogItem::Tv(show)) => show.is_anime(),
            _ => true,
        };
        self.fetch_page(&request, target, query.page, keep).await
    }

    async fn fetch_page<F>(
        &self,
        request: &CatalogRequest,
        target: ResultKind,
        page: u32,
        keep: F,
    ) -> Result<BrowsePage, CatalogError>
    where
        F: Fn(&CatalogItem) -> bool,
    {
        let (items, total_pages, total_results): (Vec<CatalogItem>, u32, u32) =
            match target.content_kind() {
                ContentKind::Movie => {
                    let upstream: TmdbPage<TmdbMovie> = fetch_as(self.catalog.as_ref(), request).await?;
                    (
                        upstream.results.into_iter().map(CatalogItem::Movie).collect(),
                        upstream.total_pages,
                        upstream.total_results,
                    )
                }
                ContentKind::Tv => {
                    let upstream: TmdbPage<TmdbTvShow> = fetch_as(self.catalog.as_ref(), request).await?;
                    (
                        upstream.results.into_iter().map(CatalogItem::Tv).collect(),
                        upstream.total_pages,
                        upstream.total_results,
                    )
                }
            };

        Ok(BrowsePage {
            results: items
                .iter()
                .filter(|item| keep(*item))
                .map(|item| normalize::normalize(item, target))
                .collect(),
            page,
            total_pages: total_pages.min(MAX_TOTAL_PAGES),
            total_results,
        })
    }
}
