pub mod auth;
pub mod browse;
pub mod content;
pub mod error;
pub mod health;
pub mod response;
pub mod search;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::database::Database;
use crate::external::identity::TokenVerifier;
use crate::services::{BrowseAggregator, ContentService};

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub content: Arc<ContentService>,
    pub browse: Arc<BrowseAggregator>,
    pub catalog_configured: bool,
    /// 未配置身份服务时为 `None`
    pub identity: Option<Arc<dyn TokenVerifier>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Catalog Backend API v1.0" }))
        .route("/health", get(health::health_check))
        // Browse & search
        .route("/browse", get(browse::browse))
        .route("/browse/genres", get(browse::genres))
        .route("/search", get(search::search))
        // Content
        .route("/content/trending/:kind", get(content::trending))
        .route("/content/:kind/:id", get(content::detail))
        // Identity
        .route("/auth/me", get(auth::me))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
