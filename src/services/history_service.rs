//! Domain service for visitors' search history and the aggregate stats
//! built on top of it.

use thiserror::Error;

use crate::db::{CityCount, CityMatch, SearchRecord};

/// Errors specific to history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for HistoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for HistoryError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<sea_orm::DbErr>().is_some() {
            Self::Database(format!("{err:#}"))
        } else {
            Self::Internal(err.to_string())
        }
    }
}

#[async_trait::async_trait]
pub trait HistoryService: Send + Sync {
    /// Appends one search for `user_id`.
    async fn record_search(&self, user_id: i32, city_name: &str)
    -> Result<SearchRecord, HistoryError>;

    /// The user's searches, most recent first.
    async fn recent(&self, user_id: i32, limit: Option<u64>)
    -> Result<Vec<SearchRecord>, HistoryError>;

    /// City of the user's latest search, if any.
    async fn last_city(&self, user_id: i32) -> Result<Option<String>, HistoryError>;

    /// Searches per city across all users.
    async fn global_stats(&self) -> Result<Vec<CityCount>, HistoryError>;

    /// Searches per city for one user.
    async fn user_stats(&self, user_id: i32) -> Result<Vec<CityCount>, HistoryError>;

    /// Distinct cities in the user's history containing `query`.
    async fn matching_cities(
        &self,
        user_id: i32,
        query: &str,
    ) -> Result<Vec<CityMatch>, HistoryError>;
}
