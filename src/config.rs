// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{AnalyticsRepository, CampaignRepository, ClientRepository, LeadRepository, TaskRepository, UserRepository},
    services::{
        ad_platforms::AdPlatformClient, analytics_service::AnalyticsService, auth::AuthService,
        campaign_service::CampaignService, client_service::ClientService, lead_service::LeadService,
        populate::Populator, task_service::TaskService, user_service::UserService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub meta_graph_url: String,
    pub google_analytics_url: String,
    pub google_property_id: Option<String>,
    pub google_access_token: Option<String>,
    pub http_timeout_secs: u64,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{key} inválida: {raw}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            port: parsed("PORT", 3000)?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            meta_graph_url: optional("META_GRAPH_URL").unwrap_or_else(|| "https://graph.facebook.com".to_string()),
            google_analytics_url: optional("GOOGLE_ANALYTICS_URL")
                .unwrap_or_else(|| "https://analyticsdata.googleapis.com".to_string()),
            google_property_id: optional("GOOGLE_PROPERTY_ID"),
            google_access_token: optional("GOOGLE_ACCESS_TOKEN"),
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS", 15)?,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub campaign_service: CampaignService,
    pub client_service: ClientService,
    pub lead_service: LeadService,
    pub task_service: TaskService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, config)
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: &Config) -> anyhow::Result<Self> {
        let user_repo = UserRepository::new(db_pool.clone());
        let campaign_repo = CampaignRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let populator = Populator::new(user_repo.clone(), campaign_repo.clone());
        let platforms = AdPlatformClient::new(config).context("Falha ao criar o cliente HTTP")?;

        Ok(Self {
            auth_service: AuthService::new(user_repo.clone(), config.jwt_secret.clone()),
            user_service: UserService::new(user_repo),
            campaign_service: CampaignService::new(campaign_repo.clone()),
            client_service: ClientService::new(client_repo.clone()),
            lead_service: LeadService::new(LeadRepository::new(db_pool.clone()), populator.clone()),
            task_service: TaskService::new(TaskRepository::new(db_pool.clone()), populator),
            analytics_service: AnalyticsService::new(
                AnalyticsRepository::new(db_pool.clone()),
                campaign_repo,
                client_repo,
                platforms,
            ),
            db_pool,
        })
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    pub const TEST_SECRET: &str = "segredo-de-teste";

    pub fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/solar_crm_test".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            port: 0,
            db_max_connections: 1,
            meta_graph_url: "http://127.0.0.1:9".to_string(),
            google_analytics_url: "http://127.0.0.1:9".to_string(),
            google_property_id: None,
            google_access_token: None,
            http_timeout_secs: 1,
        }
    }

    /// Estado com pool preguiçoso: nenhuma conexão é aberta até a primeira query.
    pub fn lazy_state() -> AppState {
        let config = test_config();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .expect("url de teste válida");
        AppState::from_pool(pool, &config).expect("estado de teste")
    }
}
