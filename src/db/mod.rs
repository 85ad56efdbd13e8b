use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::search_history::Model as SearchRecord;
pub use crate::entities::users::Model as User;
pub use repositories::history::{CityCount, CityMatch};

/// Fixed-width RFC 3339 UTC timestamp so stored values sort chronologically.
#[must_use]
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

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

        let mut opt = ConnectOptions::new(db_url.to_string());

        if let Some(path) = sqlite_file_path(db_url) {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !path.exists() {
                std::fs::File::create(&path)?;
            }

            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        } else {
            // Every pooled connection to `:memory:` would open its own database
            opt.max_connections(1).min_connections(1);
        }

        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
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

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    pub async fn get_user_by_cookie(&self, cookie_id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_cookie(cookie_id).await
    }

    pub async fn get_or_create_user(&self, cookie_id: &str) -> Result<User> {
        self.user_repo().get_or_create(cookie_id).await
    }

    pub async fn record_search(&self, user_id: i32, city_name: &str) -> Result<SearchRecord> {
        self.history_repo().record(user_id, city_name).await
    }

    pub async fn recent_searches(&self, user_id: i32, limit: Option<u64>) -> Result<Vec<SearchRecord>> {
        self.history_repo().recent_for_user(user_id, limit).await
    }

    pub async fn last_search(&self, user_id: i32) -> Result<Option<SearchRecord>> {
        self.history_repo().last_for_user(user_id).await
    }

    pub async fn city_counts(&self) -> Result<Vec<CityCount>> {
        self.history_repo().city_counts(None).await
    }

    pub async fn user_city_counts(&self, user_id: i32) -> Result<Vec<CityCount>> {
        self.history_repo().city_counts(Some(user_id)).await
    }

    pub async fn matching_cities(&self, user_id: i32, query: &str) -> Result<Vec<CityMatch>> {
        self.history_repo().matching_cities(user_id, query).await
    }
}

/// Filesystem location of a `SQLite` URL, or `None` for in-memory databases.
fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    if db_url.contains(":memory:") || db_url.contains("mode=memory") {
        return None;
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = path.split('?').next().unwrap_or(path);

    Some(Path::new(path).to_path_buf())
}
