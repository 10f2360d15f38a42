use core::future::Future;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::Config;

/// Failure persisting a payload
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// database error
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Destination of received webhook payloads
pub trait PayloadSink: Send + Sync + 'static {
    /// Persist one payload as it was received
    fn store(&self, payload: serde_json::Value)
    -> impl Future<Output = Result<(), SinkError>> + Send;

    /// Ok when the sink can accept payloads
    fn check_health(&self) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Stores payloads into the `indexed_data` table
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool as configured
    ///
    /// # Errors
    ///
    /// When no connection could be established
    pub async fn connect(config: &Config) -> Result<Self, SinkError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.database_url.expose_secret())
            .await?;
        Ok(Self::new(pool))
    }
}

impl PayloadSink for PostgresSink {
    #[tracing::instrument(skip_all)]
    async fn store(&self, payload: serde_json::Value) -> Result<(), SinkError> {
        let result = sqlx::query("INSERT INTO indexed_data (data) VALUES ($1)")
            .bind(sqlx::types::Json(payload))
            .execute(&self.pool)
            .await?;
        tracing::debug!(rows = result.rows_affected(), "payload stored");
        Ok(())
    }

    async fn check_health(&self) -> Result<(), SinkError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
