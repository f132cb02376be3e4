//! Repository for the `jf_library_items` table.

use sqlx::PgPool;

use crate::models::library::{LibraryItem, UpsertLibraryItem};

const COLUMNS: &str = "id, parent_id, name, item_type, production_year, community_rating, \
    run_time_ticks, size_bytes, primary_image_hash, date_created, archived, \
    created_at, updated_at";

/// Provides upsert and lookup operations for library items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert an item, or refresh it and clear `archived` if it exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertLibraryItem,
    ) -> Result<LibraryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO jf_library_items
                (id, parent_id, name, item_type, production_year, community_rating,
                 run_time_ticks, size_bytes, primary_image_hash, date_created)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (id) DO UPDATE SET
                parent_id = EXCLUDED.parent_id,
                name = EXCLUDED.name,
                item_type = EXCLUDED.item_type,
                production_year = EXCLUDED.production_year,
                community_rating = EXCLUDED.community_rating,
                run_time_ticks = EXCLUDED.run_time_ticks,
                size_bytes = EXCLUDED.size_bytes,
                primary_image_hash = EXCLUDED.primary_image_hash,
                date_created = EXCLUDED.date_created,
                archived = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LibraryItem>(&query)
            .bind(&input.id)
            .bind(&input.parent_id)
            .bind(&input.name)
            .bind(&input.item_type)
            .bind(input.production_year)
            .bind(input.community_rating)
            .bind(input.run_time_ticks)
            .bind(input.size_bytes)
            .bind(&input.primary_image_hash)
            .bind(input.date_created)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<LibraryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jf_library_items WHERE id = $1");
        sqlx::query_as::<_, LibraryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Non-archived items of a library ordered by name.
    pub async fn list_by_library(
        pool: &PgPool,
        library_id: &str,
    ) -> Result<Vec<LibraryItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jf_library_items
             WHERE parent_id = $1 AND NOT archived
             ORDER BY name"
        );
        sqlx::query_as::<_, LibraryItem>(&query)
            .bind(library_id)
            .fetch_all(pool)
            .await
    }

    /// Archive items not in `present_ids`, restore those that are.
    pub async fn archive_missing(pool: &PgPool, present_ids: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jf_library_items SET archived = NOT (id = ANY($1))
             WHERE archived = (id = ANY($1))",
        )
        .bind(present_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
