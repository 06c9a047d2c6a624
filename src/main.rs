mod config;
mod handlers;
mod middleware;
mod models;
mod services;
mod utils;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::Config,
    handlers::{applications, home},
    middleware::request_log::request_log_middleware,
    utils::database::create_pool,
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = if allowed_origin.trim() == "*" {
        // Credentials rule out a literal `*`, so echo the caller's origin.
        AllowOrigin::mirror_request()
    } else {
        let origins = allowed_origin
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn build_router(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route(
            "/applications",
            get(applications::get_applications).post(applications::create_application),
        )
        .route("/applications/stats", get(applications::get_application_stats))
        .route(
            "/applications/:id",
            get(applications::get_application)
                .put(applications::update_application)
                .patch(applications::patch_application)
                .delete(applications::delete_application),
        );

    let app = Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .nest("/api", api_routes)
        .layer(cors_layer(&config.cors_allowed_origin)?)
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes))
        .layer(from_fn(request_log_middleware))
        .with_state(state);

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    let state = AppState { db };
    let app = build_router(state, &config)?;

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
