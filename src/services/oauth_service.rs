// src/services/oauth_service.rs
//
// Login social com Google: o ID token é conferido no endpoint tokeninfo.

use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CustomerType, NewUser, Role},
    services::auth::AuthService,
};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

// Resposta do tokeninfo (o Google manda booleanos como string)
#[derive(Debug, Deserialize)]
pub struct GoogleTokenInfo {
    pub aud: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: serde_json::Value,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

impl GoogleTokenInfo {
    /// Audiência tem que ser o nosso client id e o e-mail tem que estar verificado.
    pub fn into_identity(self, client_id: &str) -> Result<GoogleIdentity, AppError> {
        if self.aud != client_id {
            return Err(AppError::OAuthRejected("audience mismatch".into()));
        }
        let verified = match &self.email_verified {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) => s == "true",
            _ => false,
        };
        let email = self
            .email
            .filter(|_| verified)
            .ok_or_else(|| AppError::OAuthRejected("email not verified".into()))?;

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(GoogleIdentity { email, name, picture: self.picture })
    }
}

#[derive(Clone)]
pub struct OAuthService {
    user_repo: UserRepository,
    auth_service: AuthService,
    google_client_id: Option<String>,
    client: reqwest::Client,
    pool: PgPool,
}

impl OAuthService {
    pub fn new(
        user_repo: UserRepository,
        auth_service: AuthService,
        google_client_id: Option<String>,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            auth_service,
            google_client_id,
            client: reqwest::Client::new(),
            pool,
        }
    }

    pub async fn google_sign_in(&self, id_token: &str) -> Result<String, AppError> {
        let client_id = self
            .google_client_id
            .as_deref()
            .ok_or_else(|| AppError::OAuthRejected("google sign-in is not configured".into()))?;

        let response = self
            .client
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::OAuthRejected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::OAuthRejected(format!("tokeninfo status {}", response.status())));
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::OAuthRejected(e.to_string()))?;
        let identity = info.into_identity(client_id)?;

        let user = match self.user_repo.find_by_email(&identity.email).await? {
            Some(user) => user,
            None => {
                let created = self
                    .user_repo
                    .create_user(
                        &self.pool,
                        &NewUser {
                            name: &identity.name,
                            email: Some(&identity.email),
                            phone: None,
                            password_hash: None,
                            image: identity.picture.as_deref(),
                            role: Role::Customer,
                            customer_type: Some(CustomerType::Normal),
                        },
                    )
                    .await?;
                tracing::info!("👤 Cliente criado via Google: {}", created.id);
                created
            }
        };

        self.auth_service.create_token(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(aud: &str, verified: serde_json::Value) -> GoogleTokenInfo {
        GoogleTokenInfo {
            aud: aud.into(),
            email: Some("chan@example.com".into()),
            email_verified: verified,
            name: None,
            picture: None,
        }
    }

    #[test]
    fn accepts_verified_email_for_our_client() {
        let id = info("client-1", serde_json::json!("true")).into_identity("client-1").unwrap();
        assert_eq!(id.email, "chan@example.com");
        assert_eq!(id.name, "chan");
    }

    #[test]
    fn rejects_other_audiences() {
        let err = info("client-2", serde_json::json!(true)).into_identity("client-1").unwrap_err();
        assert!(matches!(err, AppError::OAuthRejected(_)));
    }

    #[test]
    fn rejects_unverified_email() {
        let err = info("client-1", serde_json::json!("false")).into_identity("client-1").unwrap_err();
        assert!(matches!(err, AppError::OAuthRejected(_)));
    }
}
