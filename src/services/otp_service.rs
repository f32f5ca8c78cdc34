// src/services/otp_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{OtpRepository, UserRepository},
    models::{
        auth::{CustomerType, NewUser, Role},
        otp::{OtpCheck, PhoneOtp, OTP_TTL_MINUTES},
    },
    services::{auth::AuthService, sms::SmsSender},
};

/// Sem `+` o número recebe o código de país padrão.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> String {
    let trimmed: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if trimmed.starts_with('+') {
        trimmed
    } else {
        format!("{}{}", default_country_code, trimmed)
    }
}

/// Código uniforme de 6 dígitos (000000..=999999).
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{:06}", n)
}

pub fn otp_message(code: &str) -> String {
    format!("Your verification code is {}, valid for {} minutes.", code, OTP_TTL_MINUTES)
}

#[derive(Clone)]
pub struct OtpService {
    otp_repo: OtpRepository,
    user_repo: UserRepository,
    auth_service: AuthService,
    sms: Arc<dyn SmsSender>,
    default_country_code: String,
    pool: PgPool,
}

impl OtpService {
    pub fn new(
        otp_repo: OtpRepository,
        user_repo: UserRepository,
        auth_service: AuthService,
        sms: Arc<dyn SmsSender>,
        default_country_code: String,
        pool: PgPool,
    ) -> Self {
        Self { otp_repo, user_repo, auth_service, sms, default_country_code, pool }
    }

    /// Gera, grava (substituindo o anterior) e envia o código.
    /// Se o SMS falhar o código é apagado.
    pub async fn request_code(&self, raw_phone: &str) -> Result<(String, DateTime<Utc>), AppError> {
        let phone = normalize_phone(raw_phone, &self.default_country_code);
        let code = generate_code();
        let expires_at = PhoneOtp::expiry_from(Utc::now());

        self.otp_repo.replace_code(&phone, &code, expires_at).await?;

        if let Err(e) = self.sms.send(&phone, &otp_message(&code)).await {
            tracing::warn!("📵 Falha ao enviar OTP para {}: {}", phone, e);
            self.otp_repo.delete_by_phone(&self.pool, &phone).await?;
            return Err(e);
        }

        tracing::info!("🔢 Código OTP emitido para {}", phone);
        Ok((phone, expires_at))
    }

    /// Confere o código; em caso de sucesso devolve um token do usuário do
    /// telefone (criado como CUSTOMER/NORMAL se ainda não existir).
    pub async fn verify_code(&self, raw_phone: &str, code: &str) -> Result<String, AppError> {
        let phone = normalize_phone(raw_phone, &self.default_country_code);

        let mut tx = self.pool.begin().await?;

        let otp = self
            .otp_repo
            .find_for_update(&mut *tx, &phone)
            .await?
            .ok_or(AppError::OtpInvalid)?;

        match otp.check(code, Utc::now()) {
            OtpCheck::Exhausted => {
                self.otp_repo.delete_by_phone(&mut *tx, &phone).await?;
                tx.commit().await?;
                return Err(AppError::OtpTooManyAttempts);
            }
            OtpCheck::Expired => {
                self.otp_repo.delete_by_phone(&mut *tx, &phone).await?;
                tx.commit().await?;
                return Err(AppError::OtpExpired);
            }
            OtpCheck::Mismatch => {
                self.otp_repo.increment_attempts(&mut *tx, &phone).await?;
                tx.commit().await?;
                return Err(AppError::OtpInvalid);
            }
            OtpCheck::Valid => {}
        }

        self.otp_repo.delete_by_phone(&mut *tx, &phone).await?;

        let user = match self.user_repo.find_by_phone(&mut *tx, &phone).await? {
            Some(user) => user,
            None => {
                let created = self
                    .user_repo
                    .create_user(
                        &mut *tx,
                        &NewUser {
                            name: &phone,
                            email: None,
                            phone: Some(&phone),
                            password_hash: None,
                            image: None,
                            role: Role::Customer,
                            customer_type: Some(CustomerType::Normal),
                        },
                    )
                    .await?;
                tracing::info!("👤 Cliente criado via OTP: {}", created.id);
                created
            }
        };

        tx.commit().await?;

        tracing::info!("✅ OTP verificado para {}", phone);
        self.auth_service.create_token(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_numbers_get_the_default_country_code() {
        assert_eq!(normalize_phone("9123 4567", "+852"), "+85291234567");
        assert_eq!(normalize_phone(" +5511999990000 ", "+852"), "+5511999990000");
    }

    #[test]
    fn codes_always_have_six_digits() {
        for _ in 0..500 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn message_mentions_code_and_validity() {
        let text = otp_message("042917");
        assert!(text.contains("042917"));
        assert!(text.contains("5 minutes"));
    }
}
