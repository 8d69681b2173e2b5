use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::repo::{SessionRepo, UserRepo},
    categories::repo::CategoryRepo,
    config::AppConfig,
    projects::repo::ProjectRepo,
    tasks::repo::TaskRepo,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return Self::UniqueViolation(constraint);
            }
        }
        Self::Other(e.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the handlers and the request gate need from persistence.
pub trait Store: UserRepo + SessionRepo + CategoryRepo + ProjectRepo + TaskRepo {}

impl<T> Store for T where T: UserRepo + SessionRepo + CategoryRepo + ProjectRepo + TaskRepo {}

/// Postgres-backed store. Each domain module implements its repo trait for it.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")
    }
}
