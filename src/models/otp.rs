// src/models/otp.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const OTP_TTL_MINUTES: i64 = 5;
pub const OTP_MAX_ATTEMPTS: i32 = 5;

#[derive(Debug, Clone, FromRow)]
pub struct PhoneOtp {
    pub id: Uuid,
    pub phone: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}

// Resultado da comparação de um código
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    Mismatch,
    Expired,
    Exhausted,
}

impl PhoneOtp {
    pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(OTP_TTL_MINUTES)
    }

    /// Ordem: limite de tentativas, depois expiração, depois igualdade.
    pub fn check(&self, code: &str, now: DateTime<Utc>) -> OtpCheck {
        if self.attempts >= OTP_MAX_ATTEMPTS {
            return OtpCheck::Exhausted;
        }
        if now > self.expires_at {
            return OtpCheck::Expired;
        }
        if self.code.trim() != code.trim() {
            return OtpCheck::Mismatch;
        }
        OtpCheck::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn otp(attempts: i32, expires_in_secs: i64) -> PhoneOtp {
        let now = Utc::now();
        PhoneOtp {
            id: Uuid::new_v4(),
            phone: "+85291234567".into(),
            code: "123456".into(),
            expires_at: now + Duration::seconds(expires_in_secs),
            attempts,
            created_at: now,
        }
    }

    #[test]
    fn matching_code_inside_window_is_valid() {
        assert_eq!(otp(0, 60).check("123456", Utc::now()), OtpCheck::Valid);
    }

    #[test]
    fn wrong_code_is_a_mismatch() {
        assert_eq!(otp(0, 60).check("654321", Utc::now()), OtpCheck::Mismatch);
    }

    #[test]
    fn expired_code_is_rejected_even_if_equal() {
        assert_eq!(otp(0, -1).check("123456", Utc::now()), OtpCheck::Expired);
    }

    #[test]
    fn attempt_limit_wins_over_everything() {
        assert_eq!(
            otp(OTP_MAX_ATTEMPTS, 60).check("123456", Utc::now()),
            OtpCheck::Exhausted
        );
        assert_eq!(
            otp(OTP_MAX_ATTEMPTS - 1, 60).check("123456", Utc::now()),
            OtpCheck::Valid
        );
    }

    #[test]
    fn expiry_is_five_minutes() {
        let now = Utc::now();
        assert_eq!(PhoneOtp::expiry_from(now) - now, Duration::minutes(5));
    }
}
