// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, CustomerType, NewUser, Role, User},
};

pub const BCRYPT_COST: u32 = 10;

/// Hash em thread separada (bcrypt é CPU-bound).
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, BCRYPT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_days: i64, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, token_ttl_days, pool }
    }

    /// Cadastro público: sempre CUSTOMER / NORMAL.
    pub async fn register_customer(&self, name: &str, email: &str, password: &str) -> Result<String, AppError> {
        let hashed_password = hash_password(password).await?;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                &NewUser {
                    name: name.trim(),
                    email: Some(email.trim()),
                    phone: None,
                    password_hash: Some(&hashed_password),
                    image: None,
                    role: Role::Customer,
                    customer_type: Some(CustomerType::Normal),
                },
            )
            .await?;

        tracing::info!("👤 Novo cliente cadastrado: {}", user.id);
        self.create_token(&user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Contas criadas por OTP/Google não têm senha
        let password_hash = user.password_hash.clone().ok_or(AppError::InvalidCredentials)?;
        let password_clone = password.to_owned();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&user)
    }

    /// Só funciona enquanto não existir nenhum ADMIN.
    pub async fn create_initial_admin(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        if self.user_repo.admin_exists().await? {
            return Err(AppError::AdminAlreadyExists);
        }

        let hashed_password = hash_password(password).await?;
        let admin = self
            .user_repo
            .create_user(
                &self.pool,
                &NewUser {
                    name: name.trim(),
                    email: Some(email.trim()),
                    phone: None,
                    password_hash: Some(&hashed_password),
                    image: None,
                    role: Role::Admin,
                    customer_type: None,
                },
            )
            .await?;

        tracing::info!("🔑 Administrador inicial criado: {}", admin.id);
        Ok(admin)
    }

    /// Decodifica o token e relê o usuário (exclusões e mudança de tipo valem na hora).
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.token_ttl_days);

        let claims = Claims {
            sub: user.id,
            role: user.role,
            customer_type: user.customer_type,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        // Usa '?' para um tratamento de erro mais limpo
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::fixtures::user;
    use sqlx::postgres::PgPoolOptions;

    fn service(secret: &str, ttl_days: i64) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), secret.into(), ttl_days, pool)
    }

    #[tokio::test]
    async fn token_round_trip_carries_role_and_tier() {
        let auth = service("segredo", 7);
        let u = user(Role::Customer, Some(CustomerType::Potential));
        let token = auth.create_token(&u).unwrap();
        let claims = auth.decode_token(&token).unwrap();
        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.customer_type, Some(CustomerType::Potential));
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = service("a", 7).create_token(&user(Role::Admin, None)).unwrap();
        assert!(matches!(service("b", 7).decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let auth = service("segredo", -1);
        let token = auth.create_token(&user(Role::Employee, None)).unwrap();
        assert!(matches!(auth.decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("123456").await.unwrap();
        assert!(verify("123456", &hashed).unwrap());
        assert!(!verify("654321", &hashed).unwrap());
    }
}
