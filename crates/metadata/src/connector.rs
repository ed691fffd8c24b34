//! Shared connection pool lifecycle.

use crate::error::MetadataResult;
use crate::postgres::PostgresStore;
use beacon_core::config::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;

/// Bound on waiting for the initialization lock. A caller that cannot get
/// the lock within this window uses whatever pool reference exists instead
/// of queuing behind a stalled initializer.
const INIT_LOCK_TIMEOUT: Duration = Duration::from_secs(3);

/// Ordered schema bootstrap scripts, applied once per fresh pool.
const BOOTSTRAP_SCRIPTS: [(&str, &str); 3] = [
    ("tables", include_str!("schema/tables.sql")),
    ("functions", include_str!("schema/functions.sql")),
    ("views", include_str!("schema/views.sql")),
];

/// Owner of the process-wide PostgreSQL connection pool.
///
/// The pool is created lazily on first [`acquire`](Self::acquire). The
/// initialization lock serializes creation and teardown only; ordinary
/// query execution runs concurrently over independently borrowed
/// connections. Initialization failures are logged and degrade to `None`;
/// the next call retries naturally because no pool reference is stored.
pub struct DatabaseConnector {
    pool: RwLock<Option<PgPool>>,
    init_lock: Mutex<()>,
    config: DatabaseConfig,
}

impl DatabaseConnector {
    /// Create a connector for the given connection parameters. No
    /// connection is attempted until the first [`acquire`](Self::acquire).
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            pool: RwLock::new(None),
            init_lock: Mutex::new(()),
            config,
        }
    }

    /// Get the shared pool, creating and bootstrapping it if necessary.
    ///
    /// Returns `None` when storage is unavailable: either initialization
    /// failed (logged, retried on the next call) or the initialization
    /// lock could not be obtained in time and no pool exists yet. Callers
    /// must treat `None` as a DATABASE_FAILURE outcome for the enclosing
    /// operation.
    pub async fn acquire(&self) -> Option<PgPool> {
        let _guard = match timeout(INIT_LOCK_TIMEOUT, self.init_lock.lock()).await {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!(
                    "timed out waiting for pool initialization lock, using current pool state"
                );
                return self.pool.read().await.clone();
            }
        };

        // Fast path: another caller finished initialization while we waited.
        if let Some(pool) = self.pool.read().await.as_ref() {
            return Some(pool.clone());
        }

        match self.initialize_pool().await {
            Ok(pool) => {
                *self.pool.write().await = Some(pool.clone());
                tracing::info!(
                    host = %self.config.host,
                    database = %self.config.database,
                    "connection pool initialized"
                );
                Some(pool)
            }
            Err(err) => {
                tracing::error!(error = %err, "connection pool initialization failed");
                *self.pool.write().await = None;
                None
            }
        }
    }

    /// A repository view over the shared pool, if storage is available.
    pub async fn store(&self) -> Option<PostgresStore> {
        self.acquire().await.map(PostgresStore::new)
    }

    /// Detach and close the shared pool.
    ///
    /// The stored reference is cleared under the initialization lock; the
    /// detached pool is closed outside the lock so a slow teardown cannot
    /// stall other callers. Closing with no pool present is a no-op.
    pub async fn close(&self) {
        let pool = {
            let _guard = match timeout(INIT_LOCK_TIMEOUT, self.init_lock.lock()).await {
                Ok(guard) => guard,
                Err(_) => {
                    tracing::warn!("timed out waiting for pool initialization lock during close");
                    return;
                }
            };
            self.pool.write().await.take()
        };

        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!("connection pool closed");
        }
    }

    async fn initialize_pool(&self) -> MetadataResult<PgPool> {
        let opts = PgConnectOptions::new()
            .host(&self.config.host)
            .database(&self.config.database)
            .username(&self.config.user)
            .password(&self.config.password);

        let pool = PgPoolOptions::new().connect_with(opts).await?;

        // Discard the partially-built pool if bootstrap fails, so no caller
        // ever observes a pool with a half-applied schema.
        if let Err(err) = bootstrap_schema(&pool).await {
            pool.close().await;
            return Err(err);
        }

        Ok(pool)
    }
}

/// Apply the bootstrap scripts in order on one borrowed connection.
///
/// The scripts are idempotent, so re-running them on a fresh pool after a
/// process restart is safe. Each script is executed whole: `functions.sql`
/// contains plpgsql bodies, which rules out statement splitting.
async fn bootstrap_schema(pool: &PgPool) -> MetadataResult<()> {
    let mut conn = pool.acquire().await?;
    for (name, script) in BOOTSTRAP_SCRIPTS {
        sqlx::raw_sql(script).execute(conn.as_mut()).await?;
        tracing::debug!(script = name, "schema bootstrap script applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DatabaseConfig {
        DatabaseConfig {
            database: "beacon_test".to_string(),
            host: "127.0.0.1".to_string(),
            user: "postgres".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn test_bootstrap_scripts_ordered() {
        let names: Vec<_> = BOOTSTRAP_SCRIPTS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["tables", "functions", "views"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_times_out_without_touching_state() {
        // Property: a caller that cannot obtain the initialization lock
        // within the bound returns the prior pool state unchanged.
        let connector = DatabaseConnector::new(test_config());

        let _held = connector.init_lock.lock().await;
        let pool = connector.acquire().await;

        assert!(pool.is_none());
        assert!(connector.pool.read().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_without_pool_is_noop() {
        let connector = DatabaseConnector::new(test_config());
        connector.close().await;
        assert!(connector.pool.read().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_times_out_while_initializing() {
        let connector = DatabaseConnector::new(test_config());
        let _held = connector.init_lock.lock().await;
        // Must return (after the bounded wait) instead of deadlocking.
        connector.close().await;
    }
}

fn _assert_store_send(c: &DatabaseConnector) {
    fn is_send<T: Send>(_: T) {}
    is_send(c.store());
    is_send(c.acquire());
}
