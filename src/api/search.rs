use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Serialize;
use std::time::Instant;

use super::error::ApiResult;
use super::response::success;
use super::AppState;
use crate::models::{SearchParams, SearchQuery};
use crate::services::BrowsePage;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub page: BrowsePage,
    pub query: String,
}

/// 按标题搜索目录
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<impl IntoResponse> {
    let query = SearchQuery::from_params(&params)?;
    let start = Instant::now();

    let page = state.browse.search(&query).await?;

    tracing::debug!(
        query = %query.query,
        kind = query.kind.as_str(),
        results = page.results.len(),
        took_ms = start.elapsed().as_millis() as u64,
        "Search completed"
    );

    Ok(success(SearchResponse {
        page,
        query: query.query,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get, json_body, state_with};
    use crate::external::BROWSE_TIMEOUT;
    use crate::testing::{anime_json, movie_json, page_json, tv_json, FakeCatalog};
    use axum::http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_short_query_rejected() {
        let catalog = Arc::new(FakeCatalog::new());
        let state = state_with(catalog.clone()).await;

        let response = get(state, "/search?q=b").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Search query must be at least 2 characters");
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn test_movie_search() {
        let catalog = Arc::new(FakeCatalog::new().respond(
            "/search/movie",
            page_json(vec![movie_json(268, "Batman")], 2, 30),
        ));
        let state = state_with(catalog.clone()).await;

        let response = get(state, "/search?q=batman&type=movie&page=2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let call = &catalog.calls()[0];
        assert_eq!(call.param_value("query"), Some("batman"));
        assert_eq!(call.param_value("page"), Some("2"));
        assert_eq!(call.timeout, Some(BROWSE_TIMEOUT));

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["query"], "batman");
        assert_eq!(body["page"], 2);
        assert_eq!(body["totalResults"], 30);
        assert_eq!(body["results"][0]["poster"], "https://image.tmdb.org/t/p/w500/movie-268.jpg");
    }

    #[tokio::test]
    async fn test_anime_search_keeps_only_japanese_animation() {
        let catalog = Arc::new(FakeCatalog::new().respond(
            "/search/tv",
            page_json(vec![tv_json(1, "One Piece (US)"), anime_json(37854, "One Piece")], 1, 2),
        ));
        let state = state_with(catalog).await;

        let body = json_body(get(state, "/search?q=one%20piece&type=anime").await).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], 37854);
        assert_eq!(results[0]["type"], "anime");
    }
}
