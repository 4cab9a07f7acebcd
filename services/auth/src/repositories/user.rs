//! User repository for database operations

use common::{
    error::DatabaseError,
    sql::{Connection, ConnectionPool, SqlClient, decode_row},
};
use serde_json::json;
use tracing::info;

use crate::{
    error::AuthResult,
    models::{Role, User},
    password::hash_password,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository<P> {
    client: SqlClient<P>,
}

impl<P: ConnectionPool> UserRepository<P> {
    /// Create a new user repository
    pub fn new(client: SqlClient<P>) -> Self {
        Self { client }
    }

    /// Insert a user whose password is already hashed
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AuthResult<User> {
        info!("Creating new user: {}", username);

        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let user = self
            .client
            .query_one::<User>(
                &sql,
                &[
                    json!(username),
                    json!(email),
                    json!(password_hash),
                    json!(role.as_str()),
                ],
            )
            .await?;

        Ok(user)
    }

    /// Insert a user under a fixed id and move the id sequence past it
    ///
    /// Both statements run in one transaction, so a failed insert leaves the
    /// sequence untouched.
    pub async fn create_with_id(
        &self,
        id: i64,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AuthResult<User> {
        info!("Creating user {} with id {}", username, id);

        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, role) \
             VALUES ($1::BIGINT, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let params = vec![
            json!(id),
            json!(username),
            json!(email),
            json!(password_hash),
            json!(role.as_str()),
        ];

        let user = self
            .client
            .transaction(move |conn| {
                Box::pin(async move {
                    let rows = conn.execute(&sql, &params).await?;
                    let row = rows.into_iter().next().ok_or(DatabaseError::RowNotFound)?;
                    let user: User = decode_row(row)?;

                    conn.execute(
                        "SELECT setval(pg_get_serial_sequence('users', 'id'), \
                                       (SELECT MAX(id) FROM users))",
                        &[],
                    )
                    .await?;
                    Ok::<_, DatabaseError>(user)
                })
            })
            .await?;

        Ok(user)
    }

    /// List every user, oldest first
    pub async fn list(&self) -> AuthResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        Ok(self.client.query_as(&sql, &[]).await?)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        info!("Finding user by username: {}", username);

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        Ok(self.client.query_optional(&sql, &[json!(username)]).await?)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1::BIGINT");
        Ok(self.client.query_optional(&sql, &[json!(id)]).await?)
    }

    /// Apply partial changes; `None` fields keep their value
    ///
    /// Returns `None` when no user has the given id.
    pub async fn update(
        &self,
        id: i64,
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        role: Option<Role>,
    ) -> AuthResult<Option<User>> {
        info!("Updating user: {}", id);

        let password_hash = password.map(hash_password).transpose()?;
        let sql = format!(
            "UPDATE users SET \
                username = COALESCE($2, username), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                role = COALESCE($5, role), \
                updated_at = NOW() \
             WHERE id = $1::BIGINT RETURNING {USER_COLUMNS}"
        );
        let user = self
            .client
            .query_optional(
                &sql,
                &[
                    json!(id),
                    json!(username),
                    json!(email),
                    json!(password_hash),
                    json!(role.map(|r| r.as_str())),
                ],
            )
            .await?;

        Ok(user)
    }

    /// Delete a user, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> AuthResult<bool> {
        info!("Deleting user: {}", id);

        let rows = self
            .client
            .query("DELETE FROM users WHERE id = $1::BIGINT RETURNING id", &[json!(id)])
            .await?;

        Ok(!rows.is_empty())
    }

    /// Number of registered users
    pub async fn count(&self) -> AuthResult<i64> {
        let rows = self
            .client
            .query("SELECT COUNT(*) AS count FROM users", &[])
            .await?;

        Ok(rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(|count| count.as_i64())
            .unwrap_or(0))
    }
}
