use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;
use crate::external::normalize::{backdrop_url, poster_url, year_from_date};
use crate::models::{ContentItem, ContentKind, NormalizedResult, ValidationError};

/// 详情响应，图片为完整 URL
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub overview: Option<String>,
    pub poster: String,
    pub backdrop: String,
    pub release_date: Option<String>,
    pub year: String,
    pub genres: Vec<String>,
    pub rating: f64,
    pub last_fetched: DateTime<Utc>,
}

impl From<&ContentItem> for ContentItemResponse {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.external_id,
            kind: item.kind.clone(),
            title: item.title.clone(),
            overview: item.overview.clone(),
            poster: poster_url(item.poster_path.as_deref()),
            backdrop: backdrop_url(item.backdrop_path.as_deref()),
            release_date: item.release_date.clone(),
            year: year_from_date(item.release_date.as_deref()),
            genres: item.genre_names(),
            rating: item.rating,
            last_fetched: item.last_fetched,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub item: ContentItemResponse,
    pub from_cache: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub results: Vec<NormalizedResult>,
    pub from_cache: bool,
}

fn parse_external_id(raw: &str) -> Result<i64, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId(raw.to_string())),
    }
}

/// 获取单个电影 / 电视剧详情
pub async fn detail(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let kind: ContentKind = kind.parse()?;
    let id = parse_external_id(&id)?;

    let lookup = state
        .content
        .get_or_fetch_detail(kind, id)
        .await
        .map_err(|e| ApiError::from_service(e, Some(kind)))?;

    Ok(success(DetailResponse {
        item: ContentItemResponse::from(&lookup.item),
        from_cache: lookup.from_cache,
    }))
}

/// 当日热门；写回任务在后台完成
pub async fn trending(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let kind: ContentKind = kind.parse()?;

    let list = state
        .content
        .trending(kind)
        .await
        .map_err(|e| ApiError::from_service(e, Some(kind)))?;

    Ok(success(TrendingResponse {
        results: list.results,
        from_cache: list.from_cache,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{get, json_body, state_with, state_with_store};
    use crate::database::{ContentStore, Database};
    use crate::testing::{movie_json, page_json, FakeCatalog, StalledStore};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_parse_external_id() {
        assert_eq!(parse_external_id("550").unwrap(), 550);
        assert!(parse_external_id("0").is_err());
        assert!(parse_external_id("-3").is_err());
        assert!(parse_external_id("abc").is_err());
    }

    #[tokio::test]
    async fn test_detail_fetched_then_served_from_cache() {
        let catalog = Arc::new(FakeCatalog::new().respond("/movie/550", movie_json(550, "Fight Club")));
        let state = state_with(catalog.clone()).await;

        let response = get(state.clone(), "/content/movie/550").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["fromCache"], false);
        assert_eq!(body["item"]["title"], "Fight Club");
        assert_eq!(body["item"]["type"], "movie");
        assert_eq!(body["item"]["year"], "2021");
        assert_eq!(body["item"]["poster"], "https://image.tmdb.org/t/p/w500/movie-550.jpg");
        assert_eq!(body["item"]["backdrop"], "/placeholder-backdrop.jpg");
        assert_eq!(body["item"]["genres"][0], "Action");

        let body = json_body(get(state.clone(), "/content/movie/550").await).await;
        assert_eq!(body["fromCache"], true);
        assert_eq!(catalog.call_count(), 1);
        assert_eq!(state.database.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_detail_not_found_uses_kind_message() {
        let catalog = Arc::new(FakeCatalog::new().fail("/tv/42", 404).fail("/movie/42", 404));
        let state = state_with(catalog).await;

        let response = get(state.clone(), "/content/tv/42").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "TV show not found");

        let response = get(state, "/content/movie/42").await;
        assert_eq!(json_body(response).await["error"], "Movie not found");
    }

    #[tokio::test]
    async fn test_detail_rejects_bad_path_before_upstream() {
        let catalog = Arc::new(FakeCatalog::new());
        let state = state_with(catalog.clone()).await;

        assert_eq!(get(state.clone(), "/content/book/1").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get(state, "/content/movie/abc").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_status_passthrough() {
        let catalog = Arc::new(FakeCatalog::new().fail("/movie/7", 503));
        let state = state_with(catalog).await;

        let response = get(state, "/content/movie/7").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_trending_movies_second_call_from_cache() {
        let catalog = Arc::new(FakeCatalog::new().respond(
            "/trending/movie/day",
            page_json(vec![movie_json(1, "One")], 1, 1),
        ));
        let state = state_with(catalog.clone()).await;

        let body = json_body(get(state.clone(), "/content/trending/movie").await).await;
        assert_eq!(body["fromCache"], false);
        assert_eq!(body["results"][0]["title"], "One");

        let body = json_body(get(state, "/content/trending/movie").await).await;
        assert_eq!(body["fromCache"], true);
        assert_eq!(body["results"][0]["title"], "One");
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_trending_responds_while_writes_pending() {
        let catalog = Arc::new(FakeCatalog::new().respond(
            "/trending/movie/day",
            page_json(vec![movie_json(1, "One"), movie_json(2, "Two")], 1, 2),
        ));
        let store = Arc::new(StalledStore::new());
        let database = Database::in_memory().await.unwrap();
        let state = state_with_store(catalog, store.clone(), database);

        let response = tokio::time::timeout(Duration::from_secs(1), get(state, "/content/trending/movie"))
            .await
            .expect("trending response should not wait for upserts");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["results"].as_array().unwrap().len(), 2);

        store.wait_started(2).await;
        assert_eq!(store.started(), 2);
    }
}
