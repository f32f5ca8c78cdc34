// src/db/broadcast_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::broadcast::Broadcast};

const BROADCAST_COLUMNS: &str = "id, title, content, image_url, video_url, scheduled_at, author_id, \
     created_at, updated_at";

// Campos gravados em create/update
pub struct BroadcastRecord<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub image_url: Option<&'a str>,
    pub video_url: Option<&'a str>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct BroadcastRepository {
    pool: PgPool,
}

impl BroadcastRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: Uuid, record: &BroadcastRecord<'_>) -> Result<Broadcast, AppError> {
        let broadcast = sqlx::query_as::<_, Broadcast>(&format!(
            r#"
            INSERT INTO broadcasts (title, content, image_url, video_url, scheduled_at, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BROADCAST_COLUMNS}
            "#
        ))
        .bind(record.title)
        .bind(record.content)
        .bind(record.image_url)
        .bind(record.video_url)
        .bind(record.scheduled_at)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(broadcast)
    }

    pub async fn update(&self, id: Uuid, record: &BroadcastRecord<'_>) -> Result<Option<Broadcast>, AppError> {
        let broadcast = sqlx::query_as::<_, Broadcast>(&format!(
            r#"
            UPDATE broadcasts
            SET title = $2, content = $3, image_url = $4, video_url = $5,
                scheduled_at = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {BROADCAST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(record.title)
        .bind(record.content)
        .bind(record.image_url)
        .bind(record.video_url)
        .bind(record.scheduled_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(broadcast)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Broadcast>, AppError> {
        let broadcast = sqlx::query_as::<_, Broadcast>(&format!(
            "SELECT {BROADCAST_COLUMNS} FROM broadcasts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(broadcast)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM broadcasts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_all(&self) -> Result<Vec<Broadcast>, AppError> {
        let broadcasts = sqlx::query_as::<_, Broadcast>(&format!(
            "SELECT {BROADCAST_COLUMNS} FROM broadcasts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(broadcasts)
    }

    /// Publicados = sem agendamento ou agendamento já vencido em `now`.
    pub async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Broadcast>, AppError> {
        let broadcasts = sqlx::query_as::<_, Broadcast>(&format!(
            r#"
            SELECT {BROADCAST_COLUMNS} FROM broadcasts
            WHERE scheduled_at IS NULL OR scheduled_at <= $1
            ORDER BY COALESCE(scheduled_at, created_at) DESC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(broadcasts)
    }

    /// Publicados entre `since` e `now` (data efetiva = agendamento ou criação).
    pub async fn count_published_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM broadcasts
            WHERE COALESCE(scheduled_at, created_at) > $1
              AND (scheduled_at IS NULL OR scheduled_at <= $2)
            "#,
        )
        .bind(since)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
