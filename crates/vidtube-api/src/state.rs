//! Shared application state.

use std::sync::Arc;

use anyhow::{Context, Result};
use vidtube_db::Db;
use vidtube_media::MediaClient;

use crate::config::ApiConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: Db,
    pub media: Arc<MediaClient>,
}

impl AppState {
    /// Build state from the environment: database connection plus media client.
    pub async fn from_env(config: ApiConfig) -> Result<Self> {
        let db = Db::from_env()
            .await
            .context("failed to connect to the database")?;

        let media = MediaClient::from_env().context("failed to initialize the media client")?;

        Ok(Self {
            config,
            db,
            media: Arc::new(media),
        })
    }
}
