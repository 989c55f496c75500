//! `PostgreSQL` bootstrap and blocking helpers shared by the Diesel adapters.
//!
//! The pool is built once at startup and handed to each repository
//! explicitly. Diesel calls are synchronous, so adapters run them through
//! [`run_blocking_with`] to keep the async executor free.

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for adapter internals.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Schema applied at startup and by database-backed tests.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-19-000000_create_users_and_tasks/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("database connection failed: {0}")]
    Pool(#[from] PoolError),

    /// Applying the schema failed.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),
}

/// Builds a connection pool, failing if the database is unreachable.
///
/// # Errors
///
/// Returns [`DatabaseError::Pool`] when no connection can be established
/// within the configured timeout.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connect_timeout)
        .build(manager)?;
    Ok(pool)
}

/// Applies [`SCHEMA_SQL`] using a pooled connection.
///
/// # Errors
///
/// Returns [`DatabaseError`] when no connection is available or a statement
/// fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA_SQL)?;
    Ok(())
}

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}
