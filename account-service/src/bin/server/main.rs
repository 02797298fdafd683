use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::ports::AccountServicePort;
use account_service::domain::user::service::AccountService;
use account_service::inbound::http::cookies::CookieSettings;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::TokenService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_lifetime_days = config.jwt.expiration_days,
        cookie_lifetime_days = config.jwt.cookie_expiration_days,
        cookie_secure = config.jwt.cookie_secure,
        "Configuration loaded"
    );

    let account_service: Arc<dyn AccountServicePort> = if config.database.is_in_memory() {
        tracing::warn!(database = "memory", "Using in-memory store, data will not persist");
        Arc::new(AccountService::new(Arc::new(InMemoryUserRepository::new())))
    } else {
        let pg_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        Arc::new(AccountService::new(Arc::new(PostgresUserRepository::new(
            pg_pool,
        ))))
    };

    let token_service = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::days(config.jwt.expiration_days),
    ));
    let cookies = CookieSettings::new(
        chrono::Duration::days(config.jwt.cookie_expiration_days),
        config.jwt.cookie_secure,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, token_service, cookies);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
