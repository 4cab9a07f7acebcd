//! PostgreSQL backend for the SQL client adapter

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};
use sqlx::{
    Column, PgPool, Postgres, Row as _, TypeInfo,
    pool::PoolConnection,
    postgres::{PgArguments, PgRow},
    query::Query,
};
use tracing::{debug, warn};

use crate::{
    error::{DatabaseError, DatabaseResult},
    sql::{Connection, ConnectionPool, Row, SqlClient},
};

/// Client type used by the services
pub type PgClient = SqlClient<PgConnectionPool>;

/// Connection pool backed by `sqlx::PgPool`
#[derive(Clone)]
pub struct PgConnectionPool {
    pool: PgPool,
}

impl PgConnectionPool {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A connection checked out of a [`PgConnectionPool`]
///
/// Dropped inside an open transaction (for instance when the owning future is
/// cancelled), the connection is closed instead of going back to the pool.
pub struct PgPooledConnection {
    conn: Option<PoolConnection<Postgres>>,
    in_transaction: bool,
}

impl PgPooledConnection {
    fn conn(&mut self) -> DatabaseResult<&mut PoolConnection<Postgres>> {
        self.conn
            .as_mut()
            .ok_or(DatabaseError::Connection(sqlx::Error::PoolClosed))
    }
}

impl Drop for PgPooledConnection {
    fn drop(&mut self) {
        if !self.in_transaction {
            return;
        }
        if let Some(conn) = self.conn.take() {
            warn!("Discarding connection released inside an open transaction");
            drop(conn.detach());
        }
    }
}

#[async_trait]
impl ConnectionPool for PgConnectionPool {
    type Conn = PgPooledConnection;

    async fn acquire(&self) -> DatabaseResult<PgPooledConnection> {
        let conn = self.pool.acquire().await.map_err(DatabaseError::Connection)?;
        Ok(PgPooledConnection {
            conn: Some(conn),
            in_transaction: false,
        })
    }
}

#[async_trait]
impl Connection for PgPooledConnection {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> DatabaseResult<Vec<Row>> {
        debug!(sql = %sql, params = ?params, "query");

        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_json(query, param);
        }

        let rows = query
            .fetch_all(&mut **self.conn()?)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn begin(&mut self) -> DatabaseResult<()> {
        sqlx::query("BEGIN")
            .execute(&mut **self.conn()?)
            .await
            .map_err(DatabaseError::Transaction)?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> DatabaseResult<()> {
        sqlx::query("COMMIT")
            .execute(&mut **self.conn()?)
            .await
            .map_err(DatabaseError::Transaction)?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> DatabaseResult<()> {
        sqlx::query("ROLLBACK")
            .execute(&mut **self.conn()?)
            .await
            .map_err(DatabaseError::Transaction)?;
        self.in_transaction = false;
        Ok(())
    }

    fn release(self) {
        drop(self);
    }
}

/// Wire form of a JSON parameter
///
/// A placeholder keeps the type it was first prepared with on a connection,
/// so that type must not depend on the value. Scalars (NULL included) always
/// bind as TEXT and string arrays as TEXT[]; non-text columns cast their
/// placeholder (`$1::BIGINT`).
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(Option<String>),
    TextArray(Vec<String>),
}

impl From<&Value> for BindValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => BindValue::Text(None),
            Value::String(s) => BindValue::Text(Some(s.clone())),
            Value::Bool(b) => BindValue::Text(Some(b.to_string())),
            Value::Number(n) => BindValue::Text(Some(n.to_string())),
            Value::Array(items) if items.iter().all(Value::is_string) => BindValue::TextArray(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            other => BindValue::Text(Some(other.to_string())),
        }
    }
}

fn bind_json<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match BindValue::from(value) {
        BindValue::Text(text) => query.bind(text),
        BindValue::TextArray(items) => query.bind(items),
    }
}

/// Convert a row into a JSON object keyed by column name
fn row_to_json(row: &PgRow) -> Row {
    let mut map = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = cell_to_value(row, index, column.type_info().name());
        map.insert(column.name().to_string(), value);
    }
    map
}

fn cell_to_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    let value = match type_name {
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map(|v| v.map(Value::from)),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map(|v| v.map(Value::from)),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map(|v| v.map(Value::from)),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map(|v| v.and_then(|f| Number::from_f64(f as f64)).map(Value::Number)),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .map(|v| v.and_then(Number::from_f64).map(Value::Number)),
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .map(|v| v.map(Value::Bool)),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map(|v| v.map(|t| Value::String(t.to_rfc3339()))),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map(|v| v.map(|t| Value::String(t.and_utc().to_rfc3339()))),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .map(|v| v.map(|d| Value::String(d.to_string()))),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index),
        "TEXT[]" | "VARCHAR[]" => row
            .try_get::<Option<Vec<String>>, _>(index)
            .map(|v| v.map(Value::from)),
        _ => row
            .try_get::<Option<String>, _>(index)
            .map(|v| v.map(Value::String)),
    };

    match value {
        Ok(Some(v)) => v,
        Ok(None) => Value::Null,
        Err(e) => {
            warn!("Unsupported column type {}: {}", type_name, e);
            Value::Null
        }
    }
}
