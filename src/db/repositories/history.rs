use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::search_history;

/// Number of searches for one city.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CityCount {
    pub city_name: String,
    pub count: i64,
}

/// A city from a user's own history that contains the suggestion query.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CityMatch {
    pub city_name: String,
    pub searches: i64,
    /// Row id of the earliest search, used as the tie-break
    pub first_seen: i64,
}

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, user_id: i32, city_name: &str) -> Result<search_history::Model> {
        let active = search_history::ActiveModel {
            user_id: Set(user_id),
            city_name: Set(city_name.to_string()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to record search")
    }

    pub async fn recent_for_user(
        &self,
        user_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<search_history::Model>> {
        search_history::Entity::find()
            .filter(search_history::Column::UserId.eq(user_id))
            .order_by_desc(search_history::Column::SearchedAt)
            .order_by_desc(search_history::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to load search history")
    }

    pub async fn last_for_user(&self, user_id: i32) -> Result<Option<search_history::Model>> {
        Ok(self.recent_for_user(user_id, Some(1)).await?.into_iter().next())
    }

    /// Searches per city, most searched first; restricted to one user if given.
    pub async fn city_counts(&self, user_id: Option<i32>) -> Result<Vec<CityCount>> {
        let mut query = search_history::Entity::find()
            .select_only()
            .column(search_history::Column::CityName)
            .column_as(search_history::Column::Id.count(), "count");

        if let Some(user_id) = user_id {
            query = query.filter(search_history::Column::UserId.eq(user_id));
        }

        query
            .group_by(search_history::Column::CityName)
            .order_by_desc(search_history::Column::Id.count())
            .order_by_asc(search_history::Column::CityName)
            .into_model::<CityCount>()
            .all(&self.conn)
            .await
            .context("Failed to aggregate city stats")
    }

    /// Distinct cities in the user's history containing `query`
    /// (Unicode case-insensitive), most searched first, then oldest first.
    ///
    /// SQLite only folds ASCII case, so the containment check runs here on
    /// the grouped rows.
    pub async fn matching_cities(&self, user_id: i32, query: &str) -> Result<Vec<CityMatch>> {
        let needle = query.to_lowercase();

        let cities = search_history::Entity::find()
            .select_only()
            .column(search_history::Column::CityName)
            .column_as(search_history::Column::Id.count(), "searches")
            .column_as(search_history::Column::Id.min(), "first_seen")
            .filter(search_history::Column::UserId.eq(user_id))
            .group_by(search_history::Column::CityName)
            .order_by_desc(search_history::Column::Id.count())
            .order_by_asc(search_history::Column::Id.min())
            .into_model::<CityMatch>()
            .all(&self.conn)
            .await
            .context("Failed to match search history")?;

        Ok(cities
            .into_iter()
            .filter(|city| city.city_name.to_lowercase().contains(&needle))
            .collect())
    }
}
