// src/db/otp_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::otp::PhoneOtp};

#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava o código do telefone, substituindo qualquer código anterior
    /// e zerando as tentativas.
    pub async fn replace_code(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PhoneOtp, AppError> {
        let otp = sqlx::query_as::<_, PhoneOtp>(
            r#"
            INSERT INTO phone_otps (phone, code, expires_at, attempts)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (phone) DO UPDATE
                SET code = EXCLUDED.code,
                    expires_at = EXCLUDED.expires_at,
                    attempts = 0,
                    created_at = NOW()
            RETURNING id, phone, code, expires_at, attempts, created_at
            "#,
        )
        .bind(phone)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(otp)
    }

    /// Lê o código travando a linha (usado dentro da transação de verificação).
    pub async fn find_for_update<'e, E>(&self, executor: E, phone: &str) -> Result<Option<PhoneOtp>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let otp = sqlx::query_as::<_, PhoneOtp>(
            r#"
            SELECT id, phone, code, expires_at, attempts, created_at
            FROM phone_otps WHERE phone = $1
            FOR UPDATE
            "#,
        )
        .bind(phone)
        .fetch_optional(executor)
        .await?;
        Ok(otp)
    }

    pub async fn increment_attempts<'e, E>(&self, executor: E, phone: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE phone_otps SET attempts = attempts + 1 WHERE phone = $1")
            .bind(phone)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_by_phone<'e, E>(&self, executor: E, phone: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM phone_otps WHERE phone = $1")
            .bind(phone)
            .execute(executor)
            .await?;
        Ok(())
    }
}
