use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::{auth::JwtKeys, config::AppConfig, users::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
    pub keys: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for UserStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("using postgres user store");
                UserStore::postgres(db)
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                UserStore::in_memory()
            }
        };
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: UserStore, config: Arc<AppConfig>) -> Self {
        let keys = JwtKeys::from_config(&config.jwt);
        Self { store, keys, config }
    }

    /// In-memory state with test configuration.
    pub fn fake() -> Self {
        Self::from_parts(UserStore::in_memory(), Arc::new(AppConfig::for_tests()))
    }
}
