use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{ProgressStore, StorageError};

#[async_trait]
impl ProgressStore for SqliteRepository {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT payload FROM progress_slots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|row| row.try_get::<String, _>("payload").map_err(ser))
            .transpose()
    }

    async fn write_slot(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress_slots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        debug!(key, bytes = payload.len(), "wrote progress slot");
        Ok(())
    }

    async fn clear_slot(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_slots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        debug!(key, "cleared progress slot");
        Ok(())
    }
}
