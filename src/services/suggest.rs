//! City autocomplete.
//!
//! Candidates come from three tiers, in order:
//! 1. cities from the visitor's own history that start with the query,
//! 2. cities from the visitor's own history that merely contain it,
//! 3. live results from the geocoder.
//!
//! History tiers are ranked by how often the visitor searched them, then by
//! when they first did. Names are compared case-insensitively and only the
//! first occurrence of a name is kept.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::clients::open_meteo::{OpenMeteoClient, WeatherError};
use crate::db::CityMatch;
use crate::models::weather::City;
use crate::services::history_service::{HistoryError, HistoryService};

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error(transparent)]
    Upstream(#[from] WeatherError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

pub struct SuggestionService {
    history: Arc<dyn HistoryService>,
    weather: Arc<OpenMeteoClient>,
    max_results: usize,
}

impl SuggestionService {
    #[must_use]
    pub fn new(
        history: Arc<dyn HistoryService>,
        weather: Arc<OpenMeteoClient>,
        max_results: usize,
    ) -> Self {
        Self {
            history,
            weather,
            max_results,
        }
    }

    /// Suggestions for `query` as seen by `user_id`, at most `max_results`.
    pub async fn suggest(&self, user_id: i32, query: &str) -> Result<Vec<City>, SuggestError> {
        let query = query.trim();
        let matches = self.history.matching_cities(user_id, query).await?;
        let history = rank_history(query, matches);

        let upstream = if distinct_len(&history) >= self.max_results {
            tracing::debug!(query, "History fills suggestions, skipping geocoder");
            Vec::new()
        } else {
            self.weather.search_city(query).await?
        };

        Ok(blend(history, upstream, self.max_results))
    }
}

/// Orders history matches into the prefix tier followed by the substring
/// tier. Each tier keeps the incoming frequency order.
#[must_use]
pub fn rank_history(query: &str, matches: Vec<CityMatch>) -> Vec<City> {
    let needle = query.to_lowercase();

    let (prefix, substring): (Vec<_>, Vec<_>) = matches
        .into_iter()
        .partition(|m| m.city_name.to_lowercase().starts_with(&needle));

    prefix
        .into_iter()
        .chain(substring)
        .map(|m| City::from_history(m.city_name, m.searches))
        .collect()
}

/// History first, then upstream, dropping repeated names and stopping at `max`.
#[must_use]
pub fn blend(history: Vec<City>, upstream: Vec<City>, max: usize) -> Vec<City> {
    let mut seen = HashSet::new();

    history
        .into_iter()
        .chain(upstream)
        .filter(|city| seen.insert(city.name.to_lowercase()))
        .take(max)
        .collect()
}

fn distinct_len(cities: &[City]) -> usize {
    cities
        .iter()
        .map(|c| c.name.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}
