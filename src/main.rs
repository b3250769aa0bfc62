use std::sync::Arc;

use catalog_backend::{
    api,
    config::AppConfig,
    database::Database,
    external::{
        identity::{self, HttpTokenVerifier},
        MemoryKeyValueCache, TmdbClient,
    },
    services::{BrowseAggregator, ContentService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    let config = AppConfig::from_env();

    // Initialize database
    let database = Database::new(&config.database_url).await?;

    // Initialize external API clients
    let tmdb = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_language.clone(),
    ));
    let catalog_configured = tmdb.is_configured();
    if !catalog_configured {
        tracing::warn!("TMDB_API_KEY not set, catalog requests will return 503");
    }

    let identity = match &config.identity {
        Some(identity_config) => {
            identity::init(Arc::new(HttpTokenVerifier::new(identity_config.clone())))?;
            tracing::info!("Identity verifier initialized");
            identity::verifier()
        }
        None => {
            tracing::warn!("IDENTITY_API_KEY not set, /auth routes will return 503");
            None
        }
    };

    let kv = Arc::new(MemoryKeyValueCache::default());
    let content = ContentService::new(tmdb.clone(), Arc::new(database.store().clone()), kv);
    let browse = BrowseAggregator::new(tmdb);

    let app = api::router(api::AppState {
        database,
        content: Arc::new(content),
        browse: Arc::new(browse),
        catalog_configured,
        identity,
    });

    // Run the server
    let addr = config.socket_addr()?;
    tracing::info!("🚀 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
