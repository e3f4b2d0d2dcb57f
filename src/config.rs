// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{
        i18n::I18nStore,
        storage::{FileStore, LocalFileStore},
    },
    db::{ContractRepository, NoticeRepository, PaymentRepository, PropertyRepository, UserRepository},
    services::{
        auth::AuthService, billing_service::BillingService, contract_service::ContractService,
        document_service::DocumentService, inspection_service::InspectionService,
        property_service::PropertyService,
    },
};

// Configuração lida do ambiente (.env é opcional)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub web_root: String,
    pub fonts_dir: String,
    pub pix_payload: String,
    pub jwt_ttl_days: i64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            db_max_connections: var_or("DB_MAX_CONNECTIONS", "5")
                .parse()
                .context("DB_MAX_CONNECTIONS inválido")?,
            web_root: var_or("WEB_ROOT", "wwwroot"),
            fonts_dir: var_or("FONTS_DIR", "./fonts"),
            pix_payload: var_or("PIX_PAYLOAD", "000201PIXDATAAQUI"),
            jwt_ttl_days: var_or("JWT_TTL_DAYS", "7").parse().context("JWT_TTL_DAYS inválido")?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub contract_service: ContractService,
    pub billing_service: BillingService,
    pub inspection_service: InspectionService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let file_store: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&settings.web_root));
        Ok(Self::from_parts(db_pool, settings, file_store))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(db_pool: PgPool, settings: Settings, file_store: Arc<dyn FileStore>) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let contract_repo = ContractRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let notice_repo = NoticeRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            settings.jwt_secret.clone(),
            settings.jwt_ttl_days,
            db_pool.clone(),
        );
        let property_service = PropertyService::new(property_repo.clone(), contract_repo.clone(), user_repo);
        let contract_service = ContractService::new(contract_repo, property_repo.clone());
        let billing_service = BillingService::new(payment_repo, file_store.clone(), settings.pix_payload.clone());
        let inspection_service = InspectionService::new(notice_repo, property_repo, file_store);
        let document_service = DocumentService::new(billing_service.clone(), &settings.fonts_dir);

        Self {
            db_pool,
            settings,
            i18n_store: I18nStore::new(),
            auth_service,
            property_service,
            contract_service,
            billing_service,
            inspection_service,
            document_service,
        }
    }
}
