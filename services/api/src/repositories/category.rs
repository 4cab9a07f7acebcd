//! Category repository for database operations

use async_trait::async_trait;
use common::{
    error::DatabaseResult,
    sql::{ConnectionPool, SqlClient},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{CategoryStore, photo::clearable};
use crate::models::category::{Category, CategoryChanges, NewCategory};

#[derive(Deserialize)]
struct Inserted {
    id: i64,
}

/// Category repository
#[derive(Clone)]
pub struct SqlCategoryStore<P> {
    client: SqlClient<P>,
}

impl<P: ConnectionPool> SqlCategoryStore<P> {
    pub fn new(client: SqlClient<P>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<P: ConnectionPool> CategoryStore for SqlCategoryStore<P> {
    async fn list(&self) -> DatabaseResult<Vec<Category>> {
        self.client
            .query_as("SELECT id, name, description FROM categories ORDER BY name", &[])
            .await
    }

    async fn find(&self, id: i64) -> DatabaseResult<Option<Category>> {
        self.client
            .query_optional(
                "SELECT id, name, description FROM categories WHERE id = $1::BIGINT",
                &[json!(id)],
            )
            .await
    }

    async fn create(&self, category: NewCategory) -> DatabaseResult<i64> {
        info!("Creating category: {}", category.name);

        let inserted: Inserted = self
            .client
            .query_one(
                "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id",
                &[json!(category.name), json!(category.description)],
            )
            .await?;

        Ok(inserted.id)
    }

    async fn update(&self, id: i64, changes: CategoryChanges) -> DatabaseResult<bool> {
        info!("Updating category: {}", id);

        let (set_description, description) = clearable(changes.description);
        let rows = self
            .client
            .query(
                "UPDATE categories SET \
                    name = COALESCE($2, name), \
                    description = CASE WHEN $4::BOOLEAN THEN $3 ELSE description END \
                 WHERE id = $1::BIGINT RETURNING id",
                &[json!(id), json!(changes.name), description, set_description],
            )
            .await?;

        Ok(!rows.is_empty())
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting category: {}", id);

        let rows = self
            .client
            .query(
                "DELETE FROM categories WHERE id = $1::BIGINT RETURNING id",
                &[json!(id)],
            )
            .await?;

        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::scripted::ScriptedPool;
    use common::database::{self, DatabaseConfig, init_pool, run_migrations};
    use serde_json::Value;

    #[tokio::test]
    async fn test_update_can_clear_description() {
        let pool = ScriptedPool::default();
        pool.respond(vec![json!({"id": 2})]);

        let updated = SqlCategoryStore::new(pool.client())
            .update(
                2,
                CategoryChanges {
                    name: None,
                    description: Some(None),
                },
            )
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(
            pool.statements()[0].1,
            vec![json!(2), Value::Null, Value::Null, json!(true)]
        );
    }

    #[tokio::test]
    async fn test_update_of_missing_category() {
        let pool = ScriptedPool::default();
        pool.respond(vec![]);

        let updated = SqlCategoryStore::new(pool.client())
            .update(
                9,
                CategoryChanges {
                    name: Some("Street".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(pool.statements()[0].1[3], json!(false));
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_category_store_against_postgres() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = DatabaseConfig::from_env()?;
        config.max_connections = 1;
        config.min_connections = 1;
        let pool = init_pool(&config).await?;
        run_migrations(&pool).await?;
        let store = SqlCategoryStore::new(database::client(pool));

        let name = format!("pg-categories-{}", std::process::id());
        let id = store
            .create(NewCategory {
                name: name.clone(),
                description: Some("Faces".to_string()),
            })
            .await?;

        assert!(
            store
                .update(
                    id,
                    CategoryChanges {
                        name: None,
                        description: Some(None),
                    },
                )
                .await?
        );
        let found = store.find(id).await?.ok_or("category is missing")?;
        assert_eq!(found.name, name);
        assert_eq!(found.description, None);

        assert!(
            store
                .update(
                    id,
                    CategoryChanges {
                        name: None,
                        description: Some(Some("Portraits".to_string())),
                    },
                )
                .await?
        );
        let found = store.find(id).await?.ok_or("category is missing")?;
        assert_eq!(found.description.as_deref(), Some("Portraits"));

        assert!(store.delete(id).await?);
        assert!(!store.delete(id).await?);
        Ok(())
    }
}
