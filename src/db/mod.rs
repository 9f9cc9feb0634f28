use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::db::query::UserFilter;
use crate::entities::logs;
use crate::models::user::{UserRecord, UserUpdate};

pub mod migrator;
pub mod query;
pub mod repositories;

pub use repositories::user::ConversionError;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn audit_repo(&self) -> repositories::audit::AuditRepository {
        repositories::audit::AuditRepository::new(self.conn.clone())
    }

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserRecord>> {
        self.user_repo().list(filter).await
    }

    pub async fn get_user(&self, uuid: &str) -> Result<Option<UserRecord>> {
        self.user_repo().get(uuid).await
    }

    pub async fn insert_user(&self, record: &UserRecord) -> Result<()> {
        self.user_repo().insert(record).await
    }

    /// Returns the affected-row count so callers can tell a missing key from
    /// a successful update.
    pub async fn update_user(&self, uuid: &str, changes: &UserUpdate) -> Result<u64> {
        self.user_repo().update(uuid, changes).await
    }

    pub async fn delete_user(&self, uuid: &str) -> Result<u64> {
        self.user_repo().delete(uuid).await
    }

    pub async fn record_failure(&self, sha256: Option<&str>, message: &str) -> Result<()> {
        self.audit_repo().record(sha256, message).await
    }

    pub async fn recent_failures(&self, limit: u64) -> Result<Vec<logs::Model>> {
        self.audit_repo().recent(limit).await
    }
}
