//! GridFS-style content store over Postgres: one metadata row per image plus
//! ordered binary chunks, so retrieval never buffers the whole payload.

use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    images,
};

/// GridFS default chunk size.
pub const CHUNK_SIZE: usize = 255 * 1024;

#[derive(Debug, sqlx::FromRow)]
pub struct StoredImage {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub length: i64,
    pub created_at: DateTime<Utc>,
}

/// 24-hex object id, the same shape the resolver recognizes.
fn generate_object_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..24].to_string()
}

pub async fn store_image(
    pool: &DbPool,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> AppResult<String> {
    let id = generate_object_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO image_files (id, filename, content_type, length) VALUES ($1, $2, $3, $4)",
    )
    .bind(&id)
    .bind(filename)
    .bind(content_type)
    .bind(data.len() as i64)
    .execute(&mut *tx)
    .await?;

    for (n, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        sqlx::query("INSERT INTO image_chunks (file_id, n, data) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(n as i32)
            .bind(chunk)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(id)
}

pub async fn find_image(pool: &DbPool, id: &str) -> AppResult<Option<StoredImage>> {
    if !images::is_object_id(id) {
        return Err(AppError::BadRequest("Invalid image id".into()));
    }
    let row: Option<StoredImage> = sqlx::query_as(
        "SELECT id, filename, content_type, length, created_at FROM image_files WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Chunk-by-chunk byte stream for the HTTP response body. Each iteration
/// pulls one chunk row; the whole image is never held in memory at once.
pub fn image_stream(
    pool: DbPool,
    id: String,
) -> impl Stream<Item = Result<Vec<u8>, sqlx::Error>> + Send {
    futures::stream::unfold((pool, id, 0_i32), |(pool, id, n)| async move {
        let row: Result<Option<(Vec<u8>,)>, sqlx::Error> =
            sqlx::query_as("SELECT data FROM image_chunks WHERE file_id = $1 AND n = $2")
                .bind(&id)
                .bind(n)
                .fetch_optional(&pool)
                .await;
        match row {
            Ok(Some((data,))) => Some((Ok(data), (pool, id, n + 1))),
            Ok(None) => None,
            Err(err) => Some((Err(err), (pool, id, i32::MAX))),
        }
    })
}

pub async fn delete_image(pool: &DbPool, id: &str) -> AppResult<()> {
    if !images::is_object_id(id) {
        return Err(AppError::BadRequest("Invalid image id".into()));
    }
    let result = sqlx::query("DELETE FROM image_files WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_look_like_object_ids() {
        for _ in 0..20 {
            let id = generate_object_id();
            assert_eq!(id.len(), 24);
            assert!(images::is_object_id(&id));
        }
    }
}
