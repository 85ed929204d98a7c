//! MongoDB connection management.

use mongodb::bson::doc;
use mongodb::{Client, Database};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::tweet_repo::TweetRepository;
use crate::video_repo::VideoRepository;

/// Configuration for the MongoDB client.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection URI.
    pub uri: String,
    /// Database name.
    pub database: String,
}

impl MongoConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DbResult<Self> {
        Ok(Self {
            uri: std::env::var("MONGODB_URI")
                .map_err(|_| DbError::config_error("MONGODB_URI not set"))?,
            database: std::env::var("DB_NAME").unwrap_or_else(|_| "vidtube".to_string()),
        })
    }
}

/// Handle to the document store.
///
/// The store exclusively owns persisted entity state; no component keeps a
/// long-lived in-memory copy, every read re-fetches.
#[derive(Clone)]
pub struct Db {
    database: Database,
}

impl Db {
    /// Connect and select the configured database.
    pub async fn connect(config: MongoConfig) -> DbResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.database);
        info!("Connected to MongoDB database {}", config.database);
        Ok(Self { database })
    }

    /// Create from environment variables.
    pub async fn from_env() -> DbResult<Self> {
        Self::connect(MongoConfig::from_env()?).await
    }

    /// Repository over the `videos` collection.
    pub fn videos(&self) -> VideoRepository {
        VideoRepository::new(&self.database)
    }

    /// Repository over the `tweets` collection.
    pub fn tweets(&self) -> TweetRepository {
        TweetRepository::new(&self.database)
    }

    /// Round-trip to the store, for readiness probes.
    pub async fn ping(&self) -> DbResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
