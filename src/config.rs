// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::{Duration, Instant}};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        FinanceRepository, InventoryRepository, OfferRepository, PurchaseRepository,
        RbacRepository, SalesRepository, SettingsRepository, UserRepository,
    },
    services::{
        auth::AuthService, closure_service::ClosureService, finance_service::FinanceService,
        inventory_service::InventoryService, offer_service::OfferService,
        purchase_service::PurchaseService,
        quotation_service::QuotationService, rbac_service::RbacService,
        sales_service::SalesService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    pub jwt_expires_in_hours: i64,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_expires_in_hours: parse_or("JWT_EXPIRES_IN_HOURS", 24)?,
            cors_origins,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} tem um valor inválido: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub started_at: Instant,

    // Repositórios usados direto pelos handlers (cadastros simples)
    pub inventory_repo: InventoryRepository,
    pub settings_repo: SettingsRepository,

    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub inventory_service: InventoryService,
    pub sales_service: SalesService,
    pub closure_service: ClosureService,
    pub purchase_service: PurchaseService,
    pub quotation_service: QuotationService,
    pub finance_service: FinanceService,
    pub offer_service: OfferService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let sales_repo = Arc::new(SalesRepository::new(db_pool.clone()));
        let finance_repo = Arc::new(FinanceRepository::new(db_pool.clone()));
        let purchase_repo = Arc::new(PurchaseRepository::new(db_pool.clone()));
        let rbac_repo = Arc::new(RbacRepository::new(db_pool.clone()));
        let catalog = Arc::new(inventory_repo.clone());

        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            rbac_repo.clone(),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.jwt_expires_in_hours),
        );

        Ok(Self {
            settings_repo: SettingsRepository::new(db_pool.clone()),
            auth_service,
            rbac_service: RbacService::new(rbac_repo),
            inventory_service: InventoryService::new(catalog.clone(), catalog.clone()),
            sales_service: SalesService::new(catalog.clone(), sales_repo.clone()),
            closure_service: ClosureService::new(
                sales_repo.clone(),
                finance_repo.clone(),
                finance_repo.clone(),
            ),
            purchase_service: PurchaseService::new(purchase_repo),
            quotation_service: QuotationService::new(sales_repo),
            finance_service: FinanceService::new(finance_repo),
            offer_service: OfferService::new(Arc::new(OfferRepository::new(db_pool.clone()))),
            inventory_repo,
            db_pool,
            config: Arc::new(config),
            started_at: Instant::now(),
        })
    }
}
