use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::classifier::Classifier;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub classifier: Arc<Classifier>,
}

impl AppState {
    /// Connects the pool and trains the classifier. The model is frozen after
    /// this point and shared read-only between requests.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let classifier = Arc::new(Classifier::train().context("train classifier")?);

        Ok(Self {
            db,
            config,
            classifier,
        })
    }
}
