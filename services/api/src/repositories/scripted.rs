//! Pool double that answers statements from a script and records them

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use common::{
    error::{DatabaseError, DatabaseResult},
    sql::{Connection, ConnectionPool, Row, SqlClient},
};
use serde_json::Value;

/// Responses are consumed in order, one per executed statement
#[derive(Clone, Default)]
pub struct ScriptedPool {
    responses: Arc<Mutex<VecDeque<DatabaseResult<Vec<Row>>>>>,
    statements: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
    events: Arc<Mutex<Vec<&'static str>>>,
}

pub struct ScriptedConnection {
    pool: ScriptedPool,
}

impl ScriptedPool {
    pub fn client(&self) -> SqlClient<ScriptedPool> {
        SqlClient::new(self.clone())
    }

    pub fn respond(&self, rows: Vec<Value>) {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                _ => panic!("row fixtures must be objects"),
            })
            .collect();
        self.responses.lock().unwrap().push_back(Ok(rows));
    }

    pub fn fail(&self, error: DatabaseError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.statements.lock().unwrap().clone()
    }

    /// Transaction boundaries seen so far
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ConnectionPool for ScriptedPool {
    type Conn = ScriptedConnection;

    async fn acquire(&self) -> DatabaseResult<ScriptedConnection> {
        Ok(ScriptedConnection { pool: self.clone() })
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> DatabaseResult<Vec<Row>> {
        self.pool
            .statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        self.pool
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(DatabaseError::RowNotFound))
    }

    async fn begin(&mut self) -> DatabaseResult<()> {
        self.pool.record("begin");
        Ok(())
    }

    async fn commit(&mut self) -> DatabaseResult<()> {
        self.pool.record("commit");
        Ok(())
    }

    async fn rollback(&mut self) -> DatabaseResult<()> {
        self.pool.record("rollback");
        Ok(())
    }

    fn release(self) {}
}
