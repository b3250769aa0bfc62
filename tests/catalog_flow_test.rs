// 目录服务端到端集成测试
//
// 通过 router + 假上游验证 浏览 -> 详情 -> 缓存 的完整链路

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_backend::api::{router, AppState};
use catalog_backend::database::{ContentStore, Database};
use catalog_backend::external::{
    CatalogApi, CatalogError, CatalogRequest, MemoryKeyValueCache, TmdbClient,
};
use catalog_backend::models::ContentKind;
use catalog_backend::services::{BrowseAggregator, ContentService};

#[derive(Default)]
struct ScriptedCatalog {
    bodies: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    fn with(mut self, endpoint: &str, body: Value) -> Self {
        self.bodies.insert(endpoint.to_string(), body);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn fetch(&self, request: &CatalogRequest) -> Result<Value, CatalogError> {
        self.calls.lock().unwrap().push(request.endpoint.clone());
        self.bodies
            .get(&request.endpoint)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }
}

async fn app_state(catalog: Arc<dyn CatalogApi>, configured: bool) -> AppState {
    let database = Database::in_memory().await.unwrap();
    let content = ContentService::new(
        catalog.clone(),
        Arc::new(database.store().clone()),
        Arc::new(MemoryKeyValueCache::default()),
    );
    AppState {
        database,
        content: Arc::new(content),
        browse: Arc::new(BrowseAggregator::new(catalog)),
        catalog_configured: configured,
        identity: None,
    }
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_browse_then_detail_flow() {
    let catalog = Arc::new(
        ScriptedCatalog::default()
            .with(
                "/discover/movie",
                json!({
                    "page": 1,
                    "results": [{
                        "id": 603,
                        "title": "The Matrix",
                        "release_date": "1999-03-30",
                        "poster_path": "/matrix.jpg",
                        "vote_average": 8.2,
                        "genre_ids": [28, 878]
                    }],
                    "total_pages": 1,
                    "total_results": 1
                }),
            )
            .with(
                "/movie/603",
                json!({
                    "id": 603,
                    "title": "The Matrix",
                    "overview": "A hacker learns the truth.",
                    "release_date": "1999-03-30",
                    "poster_path": "/matrix.jpg",
                    "backdrop_path": "/matrix-bg.jpg",
                    "vote_average": 8.2,
                    "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
                }),
            ),
    );
    let state = app_state(catalog.clone(), true).await;

    let (status, body) = get_json(state.clone(), "/browse?type=movie&genre=sci-fi&year=1999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["id"], 603);
    assert_eq!(body["results"][0]["year"], "1999");
    assert_eq!(body["results"][0]["genres"], json!(["Action", "Science Fiction"]));
    assert_eq!(body["appliedFilters"]["genre"], "sci-fi");
    assert_eq!(body["appliedFilters"]["year"], "1999");

    let (status, body) = get_json(state.clone(), "/content/movie/603").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromCache"], false);
    assert_eq!(body["item"]["backdrop"], "https://image.tmdb.org/t/p/original/matrix-bg.jpg");

    let (_, body) = get_json(state.clone(), "/content/movie/603").await;
    assert_eq!(body["fromCache"], true);

    assert_eq!(catalog.calls(), vec!["/discover/movie", "/movie/603"]);
    let stored = state
        .database
        .store()
        .find(603, ContentKind::Movie)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.genre_names(), vec!["Action", "Science Fiction"]);
}

#[tokio::test]
async fn test_unknown_content_is_404() {
    let catalog = Arc::new(ScriptedCatalog::default());
    let state = app_state(catalog, true).await;

    let (status, body) = get_json(state, "/content/movie/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Movie not found"}));
}

#[tokio::test]
async fn test_unconfigured_catalog_is_503() {
    let tmdb = Arc::new(TmdbClient::new(None, "http://127.0.0.1:9", "en-US"));
    let state = app_state(tmdb, false).await;

    let (status, body) = get_json(state.clone(), "/browse?type=movie").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let (status, body) = get_json(state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["catalog"], "not_configured");
}
