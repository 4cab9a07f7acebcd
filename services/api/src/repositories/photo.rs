//! Photo repository for database operations
//!
//! Photos and their tag sets are always written together inside one
//! transaction.

use async_trait::async_trait;
use common::{
    error::{DatabaseError, DatabaseResult},
    sql::{Connection, ConnectionPool, SqlClient, decode_row},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use super::PhotoStore;
use crate::models::photo::{NewPhoto, Photo, PhotoChanges};

const PHOTO_SELECT: &str = r#"
    SELECT p.id, p.title, p.description, p.category_id, c.name AS category_name,
           p.file_url, p.thumbnail_url, p.width, p.height,
           p.upload_date, p.created_at, p.updated_at,
           ARRAY(SELECT t.name FROM photo_tags t WHERE t.photo_id = p.id ORDER BY t.name)::TEXT[] AS tags
    FROM photos p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[derive(Deserialize)]
struct Inserted {
    id: i64,
}

/// Photo repository
#[derive(Clone)]
pub struct SqlPhotoStore<P> {
    client: SqlClient<P>,
}

impl<P: ConnectionPool> SqlPhotoStore<P> {
    pub fn new(client: SqlClient<P>) -> Self {
        Self { client }
    }
}

/// "Was sent" flag and value of a clearable field, as statement parameters
pub(crate) fn clearable<T: Serialize>(field: Option<Option<T>>) -> (Value, Value) {
    (json!(field.is_some()), json!(field.flatten()))
}

/// Replace the tag set of a photo on an open connection
async fn replace_tags<C: Connection>(conn: &mut C, photo_id: i64, tags: &[String]) -> DatabaseResult<()> {
    conn.execute(
        "DELETE FROM photo_tags WHERE photo_id = $1::BIGINT",
        &[json!(photo_id)],
    )
    .await?;

    if !tags.is_empty() {
        conn.execute(
            "INSERT INTO photo_tags (photo_id, name) \
             SELECT $1::BIGINT, UNNEST($2::TEXT[]) \
             ON CONFLICT DO NOTHING",
            &[json!(photo_id), json!(tags)],
        )
        .await?;
    }

    Ok(())
}

#[async_trait]
impl<P: ConnectionPool> PhotoStore for SqlPhotoStore<P> {
    async fn list(&self, category_id: Option<i64>) -> DatabaseResult<Vec<Photo>> {
        let sql = format!(
            "{PHOTO_SELECT} WHERE ($1::BIGINT IS NULL OR p.category_id = $1::BIGINT) \
             ORDER BY p.upload_date DESC, p.id DESC"
        );
        self.client.query_as(&sql, &[json!(category_id)]).await
    }

    async fn find(&self, id: i64) -> DatabaseResult<Option<Photo>> {
        let sql = format!("{PHOTO_SELECT} WHERE p.id = $1::BIGINT");
        self.client.query_optional(&sql, &[json!(id)]).await
    }

    async fn create(&self, photo: NewPhoto) -> DatabaseResult<i64> {
        info!("Creating photo: {}", photo.title);

        self.client
            .transaction(move |conn| {
                Box::pin(async move {
                    let params: Vec<Value> = vec![
                        json!(photo.title),
                        json!(photo.description),
                        json!(photo.category_id),
                        json!(photo.file_url),
                        json!(photo.thumbnail_url),
                        json!(photo.width),
                        json!(photo.height),
                        json!(photo.upload_date),
                    ];
                    let rows = conn
                        .execute(
                            "INSERT INTO photos \
                                (title, description, category_id, file_url, thumbnail_url, \
                                 width, height, upload_date) \
                             VALUES ($1, $2, $3::BIGINT, $4, $5, $6::INTEGER, $7::INTEGER, \
                                     COALESCE($8::TIMESTAMPTZ, NOW())) \
                             RETURNING id",
                            &params,
                        )
                        .await?;
                    let row = rows.into_iter().next().ok_or(DatabaseError::RowNotFound)?;
                    let Inserted { id } = decode_row(row)?;

                    replace_tags(conn, id, &photo.tags).await?;
                    Ok::<_, DatabaseError>(id)
                })
            })
            .await
    }

    async fn update(&self, id: i64, changes: PhotoChanges) -> DatabaseResult<bool> {
        info!("Updating photo: {}", id);

        let (set_description, description) = clearable(changes.description);
        let (set_category, category_id) = clearable(changes.category_id);
        let (set_thumbnail, thumbnail_url) = clearable(changes.thumbnail_url);
        let (set_width, width) = clearable(changes.width);
        let (set_height, height) = clearable(changes.height);
        let params: Vec<Value> = vec![
            json!(id),
            json!(changes.title),
            description,
            category_id,
            json!(changes.file_url),
            thumbnail_url,
            width,
            height,
            set_description,
            set_category,
            set_thumbnail,
            set_width,
            set_height,
        ];
        let tags = changes.tags;

        self.client
            .transaction(move |conn| {
                Box::pin(async move {
                    let rows = conn
                        .execute(
                            "UPDATE photos SET \
                                title = COALESCE($2, title), \
                                description = CASE WHEN $9::BOOLEAN THEN $3 ELSE description END, \
                                category_id = CASE WHEN $10::BOOLEAN THEN $4::BIGINT ELSE category_id END, \
                                file_url = COALESCE($5, file_url), \
                                thumbnail_url = CASE WHEN $11::BOOLEAN THEN $6 ELSE thumbnail_url END, \
                                width = CASE WHEN $12::BOOLEAN THEN $7::INTEGER ELSE width END, \
                                height = CASE WHEN $13::BOOLEAN THEN $8::INTEGER ELSE height END, \
                                updated_at = NOW() \
                             WHERE id = $1::BIGINT RETURNING id",
                            &params,
                        )
                        .await?;
                    if rows.is_empty() {
                        return Ok(false);
                    }

                    if let Some(tags) = &tags {
                        replace_tags(conn, id, tags).await?;
                    }
                    Ok::<_, DatabaseError>(true)
                })
            })
            .await
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting photo: {}", id);

        let rows = self
            .client
            .query(
                "DELETE FROM photos WHERE id = $1::BIGINT RETURNING id",
                &[json!(id)],
            )
            .await?;

        Ok(!rows.is_empty())
    }
}
