//! Repository for the `jf_libraries` table.

use sqlx::PgPool;

use crate::models::library::{Library, UpsertLibrary};

const COLUMNS: &str = "id, name, server_id, collection_type, primary_image_tag, \
    archived, created_at, updated_at";

/// Provides upsert and lookup operations for libraries.
pub struct LibraryRepo;

impl LibraryRepo {
    /// Insert a library, or refresh it and clear `archived` if it exists.
    pub async fn upsert(pool: &PgPool, input: &UpsertLibrary) -> Result<Library, sqlx::Error> {
        let query = format!(
            "INSERT INTO jf_libraries (id, name, server_id, collection_type, primary_image_tag)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                server_id = EXCLUDED.server_id,
                collection_type = EXCLUDED.collection_type,
                primary_image_tag = EXCLUDED.primary_image_tag,
                archived = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Library>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.server_id)
            .bind(&input.collection_type)
            .bind(&input.primary_image_tag)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Library>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jf_libraries WHERE id = $1");
        sqlx::query_as::<_, Library>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List libraries ordered by name, optionally including archived ones.
    pub async fn list(pool: &PgPool, include_archived: bool) -> Result<Vec<Library>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jf_libraries
             WHERE $1 OR NOT archived
             ORDER BY name"
        );
        sqlx::query_as::<_, Library>(&query)
            .bind(include_archived)
            .fetch_all(pool)
            .await
    }

    /// Archive every library whose id is not in `present_ids` and restore the
    /// ones that are. Returns the number of rows whose flag changed.
    pub async fn archive_missing(pool: &PgPool, present_ids: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jf_libraries SET archived = NOT (id = ANY($1))
             WHERE archived = (id = ANY($1))",
        )
        .bind(present_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
