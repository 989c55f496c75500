//! Checklist HTTP server.
//!
//! Reads configuration from the environment, selects the `PostgreSQL` stores
//! when `DATABASE_URL` is set (in-memory stores otherwise), and serves the
//! API until interrupted.

use checklist::{
    api::{self, AppState},
    config::ServerConfig,
    database::{self, DatabaseError},
    identity::{
        adapters::{
            jwt::JwtCredentials, memory::InMemoryUserRepository,
            postgres::PostgresUserRepository,
        },
        domain::PasswordHasher,
    },
    server,
    task::adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
};
use eyre::WrapErr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "checklist=info,tower_http=info";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env().wrap_err("invalid configuration")?;
    let credentials = Arc::new(JwtCredentials::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_ttl,
    ));
    let hasher = PasswordHasher::new(config.auth.password_iterations);

    let address = config.bind_address();

    if let Some(database_config) = config.database.clone() {
        info!(url = %database_config.redacted_url(), "connecting to PostgreSQL");
        let pool = tokio::task::spawn_blocking(move || {
            let pool = database::connect(&database_config)?;
            database::apply_schema(&pool)?;
            Ok::<_, DatabaseError>(pool)
        })
        .await
        .wrap_err("database bootstrap task failed")?
        .wrap_err("database unavailable")?;
        info!("database schema ready");

        let state = AppState::assemble(
            Arc::new(PostgresTaskRepository::new(pool.clone())),
            Arc::new(PostgresUserRepository::new(pool)),
            credentials,
            hasher,
        );
        server::serve(&address, api::router(state)).await
    } else {
        warn!("DATABASE_URL not set; using in-memory stores, data is lost on exit");
        let state = AppState::assemble(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            credentials,
            hasher,
        );
        server::serve(&address, api::router(state)).await
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
