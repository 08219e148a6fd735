use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment};
use sea_orm::Database;
use serde::Deserialize;
use service::{AccountService, SeaOrmAccountRepository, TracingAuditLog};
use tracing::{debug, info};

use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://stbadmin.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from defaults, `.env` and the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Command line flags win over the environment.
    pub fn apply_overrides(&mut self, database_url: Option<String>, bind_address: Option<String>) {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Connect to the database and wire the account service
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let mut state = initialize_app_state_with_url(&settings.database_url).await?;
    state.request_timeout = settings.request_timeout();
    Ok(state)
}

/// Initialize application state against an explicit database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;
    Ok(app_state(db, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)))
}

pub fn app_state(db: sea_orm::DatabaseConnection, request_timeout: Duration) -> AppState {
    let repository = Arc::new(SeaOrmAccountRepository::new(db.clone()));
    let accounts = AccountService::new(repository, Arc::new(TracingAuditLog));

    AppState {
        db,
        accounts: Arc::new(accounts),
        request_timeout,
    }
}
