//! `SeaORM` implementation of the `HistoryService` trait.

use async_trait::async_trait;

use crate::db::{CityCount, CityMatch, SearchRecord, Store};
use crate::services::history_service::{HistoryError, HistoryService};

pub struct SeaOrmHistoryService {
    store: Store,
}

impl SeaOrmHistoryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HistoryService for SeaOrmHistoryService {
    async fn record_search(
        &self,
        user_id: i32,
        city_name: &str,
    ) -> Result<SearchRecord, HistoryError> {
        let record = self.store.record_search(user_id, city_name).await?;
        tracing::info!(user_id, city = %record.city_name, "Search recorded");
        Ok(record)
    }

    async fn recent(
        &self,
        user_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<SearchRecord>, HistoryError> {
        Ok(self.store.recent_searches(user_id, limit).await?)
    }

    async fn last_city(&self, user_id: i32) -> Result<Option<String>, HistoryError> {
        Ok(self
            .store
            .last_search(user_id)
            .await?
            .map(|record| record.city_name))
    }

    async fn global_stats(&self) -> Result<Vec<CityCount>, HistoryError> {
        Ok(self.store.city_counts().await?)
    }

    async fn user_stats(&self, user_id: i32) -> Result<Vec<CityCount>, HistoryError> {
        Ok(self.store.user_city_counts(user_id).await?)
    }

    async fn matching_cities(
        &self,
        user_id: i32,
        query: &str,
    ) -> Result<Vec<CityMatch>, HistoryError> {
        Ok(self.store.matching_cities(user_id, query).await?)
    }
}
