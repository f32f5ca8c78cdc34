// src/services/sms.rs
//
// Envio de SMS para os códigos OTP.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{common::error::AppError, config::AppConfig};

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), AppError>;
}

/// Escolhe o provedor pelo `SMS_PROVIDER`.
pub fn from_config(config: &AppConfig) -> anyhow::Result<Arc<dyn SmsSender>> {
    match config.sms_provider.as_str() {
        "twilio" => {
            let (Some(sid), Some(token), Some(from)) = (
                config.twilio_account_sid.clone(),
                config.twilio_auth_token.clone(),
                config.twilio_phone_number.clone(),
            ) else {
                anyhow::bail!(
                    "SMS_PROVIDER=twilio exige TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN e TWILIO_PHONE_NUMBER"
                );
            };
            Ok(Arc::new(TwilioSender::new(sid, token, from)))
        }
        "log" => {
            tracing::warn!("📵 SMS em modo log: os códigos OTP só aparecem no log");
            Ok(Arc::new(LogSender))
        }
        other => anyhow::bail!("SMS_PROVIDER desconhecido: {}", other),
    }
}

// --- Twilio ---

pub struct TwilioSender {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioSender {
    pub fn new(account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid,
            auth_token,
            from,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| AppError::SmsDelivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(to, status = status.as_u16(), "Twilio recusou o SMS");
            return Err(AppError::SmsDelivery(format!("{}: {}", status, detail)));
        }

        tracing::info!(to, "📨 SMS enviado");
        Ok(())
    }
}

// --- Desenvolvimento ---

pub struct LogSender;

#[async_trait]
impl SmsSender for LogSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), AppError> {
        tracing::info!(to, body, "📨 SMS (modo log)");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use super::*;

    /// Guarda as mensagens ou falha sempre, conforme `fail`.
    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl SmsSender for RecordingSender {
        async fn send(&self, to: &str, body: &str) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::SmsDelivery("indisponível".into()));
            }
            self.sent
                .lock()
                .map_err(|_| AppError::SmsDelivery("lock".into()))?
                .push((to.to_string(), body.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twilio_url_contains_account() {
        let sender = TwilioSender::new("AC123".into(), "tok".into(), "+15550000".into());
        assert_eq!(
            sender.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        assert!(LogSender.send("+85291234567", "123456").await.is_ok());
    }

    #[tokio::test]
    async fn recording_sender_keeps_messages() {
        let sender = fakes::RecordingSender::default();
        sender.send("+1", "hello").await.unwrap();
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }
}
