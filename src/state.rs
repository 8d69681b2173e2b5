use std::sync::Arc;

use crate::auth::cookie::CookiePolicy;
use crate::auth::jwt::TokenService;
use crate::config::AppConfig;
use crate::db::{PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Loads config, connects and migrates the database. Any failure here
    /// aborts startup.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = PgStore::connect(&config).await?;
        store.migrate().await?;

        Ok(Self::from_parts(Arc::new(store), config))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth));
        Self {
            store,
            tokens,
            config,
        }
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            max_age: self.tokens.ttl(),
            secure: self.config.auth.cookie_secure,
        }
    }
}
