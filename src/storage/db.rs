use anyhow::{Context, Result};
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::config::DatabaseConfig;
use crate::entities::{category, highlight, press_release, sdg, subscriber, user};
use crate::repositories::SdgRepository;

/// Database handle shared by all request handlers
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open the configured database, create missing tables and seed reference data
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let storage = Self::connect(&config.effective_url()).await?;
        if config.seed_sdgs {
            storage.seed_sdgs().await?;
        }
        Ok(storage)
    }

    /// Private in-memory database, used by tests
    pub async fn in_memory() -> Result<Self> {
        let storage = Self::connect("sqlite::memory:").await?;
        storage.seed_sdgs().await?;
        Ok(storage)
    }

    async fn connect(database_url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options.sqlx_logging(false);

        // Every pooled connection to `:memory:` would open its own empty database
        if database_url.contains(":memory:") {
            options.min_connections(1).max_connections(1);
        }

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        // Categories first: highlights reference them
        let statements = [
            schema.create_table_from_entity(category::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(highlight::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(press_release::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(subscriber::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(user::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(sdg::Entity).if_not_exists().to_owned(),
        ];

        for statement in statements {
            self.conn.execute(backend.build(&statement)).await?;
        }

        Ok(())
    }

    /// Insert the SDG reference list when the table is empty
    pub async fn seed_sdgs(&self) -> Result<()> {
        let inserted = SdgRepository::seed(&self.conn).await?;
        if inserted > 0 {
            info!("🌱 Seeded {} SDG entries", inserted);
        }
        Ok(())
    }
}
