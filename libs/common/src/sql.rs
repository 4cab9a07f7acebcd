//! SQL client adapter
//!
//! Wraps a connection pool behind a small capability set: plain queries,
//! transactional units of work and a connectivity probe. Every call acquires
//! its own connection and hands it back exactly once, whatever the outcome.

use std::fmt::Display;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::error::{DatabaseError, DatabaseResult};

/// A result row keyed by column name
pub type Row = Map<String, Value>;

/// A single connection checked out of a [`ConnectionPool`]
#[async_trait]
pub trait Connection: Send {
    /// Execute a statement with positional parameters and return its rows
    async fn execute(&mut self, sql: &str, params: &[Value]) -> DatabaseResult<Vec<Row>>;

    /// Open a transaction on this connection
    async fn begin(&mut self) -> DatabaseResult<()>;

    /// Commit the open transaction
    async fn commit(&mut self) -> DatabaseResult<()>;

    /// Roll back the open transaction
    async fn rollback(&mut self) -> DatabaseResult<()>;

    /// Hand the connection back to its pool
    ///
    /// Dropping a connection must have the same effect, and a connection
    /// dropped inside an open transaction must not be reused.
    fn release(self);
}

/// A bounded set of reusable connections
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    type Conn: Connection;

    /// Check a connection out of the pool
    async fn acquire(&self) -> DatabaseResult<Self::Conn>;
}

/// Connectivity probe, usable behind a trait object
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check_connection(&self) -> bool;
}

/// Pooled SQL client
#[derive(Clone)]
pub struct SqlClient<P> {
    pool: P,
}

impl<P: ConnectionPool> SqlClient<P> {
    /// Create a new client over the given pool
    pub fn new(pool: P) -> Self {
        Self { pool }
    }

    /// Run a single statement on a freshly acquired connection
    pub async fn query(&self, sql: &str, params: &[Value]) -> DatabaseResult<Vec<Row>> {
        let mut conn = self.pool.acquire().await?;
        let result = conn.execute(sql, params).await;
        conn.release();

        if let Err(e) = &result {
            error!("Query failed: {}", e);
        }
        result
    }

    /// Run a statement and decode every row into `T`
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DatabaseResult<Vec<T>> {
        let rows = self.query(sql, params).await?;
        decode_rows(rows)
    }

    /// Run a statement and decode the first row into `T`, if any
    pub async fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DatabaseResult<Option<T>> {
        let rows = self.query(sql, params).await?;
        rows.into_iter().next().map(decode_row).transpose()
    }

    /// Run a statement that must yield a row, typically `INSERT ... RETURNING`
    pub async fn query_one<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DatabaseResult<T> {
        self.query_optional(sql, params)
            .await?
            .ok_or(DatabaseError::RowNotFound)
    }

    /// Run `work` inside a transaction
    ///
    /// Commits when `work` succeeds and rolls back when it fails. The
    /// connection is released in every case and the error produced by `work`
    /// is returned unchanged, even if the rollback itself fails.
    pub async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut P::Conn) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<DatabaseError> + Display + Send,
    {
        let mut conn = self.pool.acquire().await?;

        if let Err(e) = conn.begin().await {
            conn.release();
            return Err(e.into());
        }
        debug!("Transaction started");

        match work(&mut conn).await {
            Ok(value) => {
                let committed = conn.commit().await;
                conn.release();
                committed?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(e) => {
                warn!("Rolling back transaction: {}", e);
                if let Err(rollback_error) = conn.rollback().await {
                    error!("Failed to roll back transaction: {}", rollback_error);
                }
                conn.release();
                Err(e)
            }
        }
    }

    /// Check database connectivity
    ///
    /// Returns `false` instead of an error when the round trip fails.
    pub async fn check_connection(&self) -> bool {
        match self.query("SELECT 1", &[]).await {
            Ok(_) => true,
            Err(e) => {
                error!("Database connectivity check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl<P: ConnectionPool> HealthCheck for SqlClient<P> {
    async fn check_connection(&self) -> bool {
        SqlClient::check_connection(self).await
    }
}

/// Decode a row into a typed model
pub fn decode_row<T: DeserializeOwned>(row: Row) -> DatabaseResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Decode a row set into typed models
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> DatabaseResult<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}
