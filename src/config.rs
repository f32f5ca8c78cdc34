// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    db::{
        BroadcastRepository, ConversationRepository, CustomerRepository, DashboardRepository,
        OtpRepository, ProductRepository, ProjectRepository, ReportRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        broadcast_service::BroadcastService,
        client_service::ClientService,
        customer_service::CustomerService,
        dashboard_service::DashboardService,
        employee_service::EmployeeService,
        messaging_service::MessagingService,
        oauth_service::OAuthService,
        otp_service::OtpService,
        product_service::ProductService,
        project_service::ProjectService,
        quote_document_service::QuoteDocumentService,
        report_service::ReportService,
        sms::{self, SmsSender},
        staff_service::StaffService,
        storage::{Storage, StorageBackend},
    },
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("A variável de ambiente {0} deve ser definida")]
    Missing(&'static str),

    #[error("Valor inválido para {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

// Configuração lida do ambiente (.env em desenvolvimento).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bind_addr: String,
    pub cors_origins: Vec<String>,

    pub storage_backend: StorageBackend,
    pub public_asset_base_url: String,

    pub sms_provider: String,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_phone_number: Option<String>,
    pub sms_default_country_code: String,

    pub google_client_id: Option<String>,
    pub pdf_font_dir: String,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_backend = match optional("STORAGE_BACKEND").as_deref().unwrap_or("fs") {
            "s3" => StorageBackend::S3 {
                endpoint: required("S3_ENDPOINT")?,
                bucket: required("S3_BUCKET")?,
                region: optional("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
                access_key_id: required("S3_ACCESS_KEY_ID")?,
                secret_access_key: required("S3_SECRET_ACCESS_KEY")?,
            },
            "fs" => StorageBackend::Fs {
                root: optional("STORAGE_ROOT").unwrap_or_else(|| "./uploads".into()),
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_days: parsed("TOKEN_TTL_DAYS", 7)?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            cors_origins: optional("CORS_ORIGINS")
                .map(|v| v.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or_default(),
            storage_backend,
            public_asset_base_url: optional("PUBLIC_ASSET_BASE_URL")
                .unwrap_or_else(|| "/uploads".into()),
            sms_provider: optional("SMS_PROVIDER").unwrap_or_else(|| "log".into()),
            twilio_account_sid: optional("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: optional("TWILIO_AUTH_TOKEN"),
            twilio_phone_number: optional("TWILIO_PHONE_NUMBER"),
            sms_default_country_code: optional("SMS_DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|| "+852".into()),
            google_client_id: optional("GOOGLE_CLIENT_ID"),
            pdf_font_dir: optional("PDF_FONT_DIR").unwrap_or_else(|| "./fonts".into()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: I18nStore,
    pub storage: Storage,

    pub auth_service: AuthService,
    pub otp_service: OtpService,
    pub oauth_service: OAuthService,
    pub customer_service: CustomerService,
    pub employee_service: EmployeeService,
    pub product_service: ProductService,
    pub project_service: ProjectService,
    pub report_service: ReportService,
    pub broadcast_service: BroadcastService,
    pub messaging_service: MessagingService,
    pub staff_service: StaffService,
    pub client_service: ClientService,
    pub dashboard_service: DashboardService,
    pub quote_document_service: QuoteDocumentService,
}

impl AppState {
    /// Conecta ao banco e monta o estado.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let storage = Storage::new(&config.storage_backend, &config.public_asset_base_url)?;
        let sms = sms::from_config(&config)?;

        Self::build(db_pool, config, storage, sms)
    }

    // --- Monta o gráfico de dependências ---
    pub fn build(
        db_pool: PgPool,
        config: AppConfig,
        storage: Storage,
        sms: Arc<dyn SmsSender>,
    ) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;

        let user_repo = UserRepository::new(db_pool.clone());
        let otp_repo = OtpRepository::new(db_pool.clone());
        let project_repo = ProjectRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());
        let broadcast_repo = BroadcastRepository::new(db_pool.clone());
        let conversation_repo = ConversationRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.token_ttl_days,
            db_pool.clone(),
        );
        let otp_service = OtpService::new(
            otp_repo,
            user_repo.clone(),
            auth_service.clone(),
            sms,
            config.sms_default_country_code.clone(),
            db_pool.clone(),
        );
        let oauth_service = OAuthService::new(
            user_repo.clone(),
            auth_service.clone(),
            config.google_client_id.clone(),
            db_pool.clone(),
        );
        let customer_service = CustomerService::new(
            user_repo.clone(),
            customer_repo,
            project_repo.clone(),
            db_pool.clone(),
        );
        let employee_service =
            EmployeeService::new(user_repo.clone(), project_repo.clone(), db_pool.clone());
        let product_service = ProductService::new(product_repo.clone(), db_pool.clone());
        let project_service = ProjectService::new(
            project_repo.clone(),
            user_repo.clone(),
            conversation_repo.clone(),
            db_pool.clone(),
        );
        let report_service =
            ReportService::new(report_repo, project_repo.clone(), storage.clone());
        let broadcast_service =
            BroadcastService::new(broadcast_repo.clone(), user_repo.clone(), storage.clone());
        let messaging_service = MessagingService::new(
            conversation_repo.clone(),
            project_repo.clone(),
            storage.clone(),
            db_pool.clone(),
        );
        let staff_service = StaffService::new(
            user_repo.clone(),
            project_repo.clone(),
            conversation_repo,
            db_pool.clone(),
        );
        let client_service = ClientService::new(
            product_repo,
            project_repo.clone(),
            user_repo.clone(),
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo, broadcast_repo);
        let quote_document_service = QuoteDocumentService::new(
            project_repo,
            user_repo,
            config.pdf_font_dir.clone(),
        );

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            i18n_store,
            storage,
            auth_service,
            otp_service,
            oauth_service,
            customer_service,
            employee_service,
            product_service,
            project_service,
            report_service,
            broadcast_service,
            messaging_service,
            staff_service,
            client_service,
            dashboard_service,
            quote_document_service,
        })
    }
}
