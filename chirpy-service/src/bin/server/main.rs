use std::sync::Arc;

use chirpy_service::config::Config;
use chirpy_service::inbound::http::router::create_router;
use chirpy_service::inbound::http::router::AppState;
use chirpy_service::inbound::http::router::Repositories;
use chirpy_service::outbound::repositories::InMemoryStore;
use chirpy_service::outbound::repositories::PostgresChirpRepository;
use chirpy_service::outbound::repositories::PostgresFollowRepository;
use chirpy_service::outbound::repositories::PostgresFriendshipRepository;
use chirpy_service::outbound::repositories::PostgresRefreshTokenRepository;
use chirpy_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "chirpy-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        persistent = config.database.url.is_some(),
        issuer = %config.jwt.issuer,
        access_token_ttl_seconds = config.jwt.access_token_ttl_seconds,
        refresh_token_ttl_days = config.session.refresh_token_ttl_days,
        "Configuration loaded"
    );

    let state = match config.database.url.as_deref() {
        Some(database_url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(database_url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repositories = Repositories {
                users: Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                refresh_tokens: Arc::new(PostgresRefreshTokenRepository::new(pg_pool.clone())),
                chirps: Arc::new(PostgresChirpRepository::new(pg_pool.clone())),
                follows: Arc::new(PostgresFollowRepository::new(pg_pool.clone())),
                friendships: Arc::new(PostgresFriendshipRepository::new(pg_pool)),
            };
            AppState::new(repositories, &config)
        }
        None => {
            tracing::warn!("No database configured, data will not survive a restart");

            let store = Arc::new(InMemoryStore::new());
            let repositories = Repositories {
                users: Arc::clone(&store),
                refresh_tokens: Arc::clone(&store),
                chirps: Arc::clone(&store),
                follows: Arc::clone(&store),
                friendships: store,
            };
            AppState::new(repositories, &config)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;
    tracing::info!("Server exited");

    Ok(())
}
