use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::response::success;
use super::AppState;
use crate::models::filters::MIN_SEARCH_LEN;
use crate::models::genres as genre_table;
use crate::models::{AppliedFilters, BrowseFilterSet, BrowseParams, ContentKind, Genre};
use crate::services::BrowsePage;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    #[serde(flatten)]
    pub page: BrowsePage,
    pub applied_filters: AppliedFilters,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
pub struct GenresParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// 搜索词有效时的跳转地址
fn search_redirect(params: &BrowseParams) -> Option<String> {
    let term = params.search.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < MIN_SEARCH_LEN {
        return None;
    }

    let kind = params.kind.as_deref().filter(|k| !k.is_empty()).unwrap_or("all");
    let page = params.page.as_deref().filter(|p| !p.is_empty()).unwrap_or("1");
    Some(format!(
        "/search?q={}&type={}&page={}",
        urlencoding::encode(term),
        urlencoding::encode(kind),
        urlencoding::encode(page)
    ))
}

/// 浏览目录
pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> ApiResult<Response> {
    // 搜索优先，跳转前不做参数校验
    if let Some(location) = search_redirect(&params) {
        tracing::debug!("Redirecting browse search to {}", location);
        return Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response());
    }

    let filters = BrowseFilterSet::from_params(&params)?;
    tracing::debug!(
        kind = filters.kind.as_str(),
        sort = filters.sort.as_str(),
        page = filters.page,
        "Browse request"
    );

    let page = state.browse.browse(&filters).await?;

    Ok(success(BrowseResponse {
        page,
        applied_filters: filters.applied(),
    })
    .into_response())
}

/// 静态类型表
pub async fn genres(Query(params): Query<GenresParams>) -> ApiResult<impl IntoResponse> {
    let kind: ContentKind = params.kind.as_deref().unwrap_or("movie").parse()?;

    Ok(success(GenresResponse {
        genres: genre_table::list(kind),
    }))
}
