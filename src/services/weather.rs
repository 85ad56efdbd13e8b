//! Forecast lookup by free-text city name.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::clients::open_meteo::{OpenMeteoClient, WeatherError};
use crate::models::weather::{City, ForecastResponse};
use crate::services::history_service::{HistoryError, HistoryService};

/// The geocoder's best match and its forecast.
#[derive(Debug, Clone, Serialize)]
pub struct CityWeather {
    pub city: City,
    pub forecast: ForecastResponse,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

pub struct WeatherService {
    client: Arc<OpenMeteoClient>,
    history: Arc<dyn HistoryService>,
}

impl WeatherService {
    #[must_use]
    pub fn new(client: Arc<OpenMeteoClient>, history: Arc<dyn HistoryService>) -> Self {
        Self { client, history }
    }

    /// Geocodes `query`, takes the first candidate and fetches its forecast.
    pub async fn fetch_weather_by_city(&self, query: &str) -> Result<CityWeather, WeatherError> {
        let query = query.trim();
        let city = self
            .client
            .search_city(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NoMatch(query.to_string()))?;

        let (latitude, longitude) = city
            .coordinates()
            .ok_or_else(|| WeatherError::MissingCoordinates(city.name.clone()))?;

        let forecast = self.client.get_forecast(latitude, longitude).await?;

        Ok(CityWeather { city, forecast })
    }

    /// Same as [`Self::fetch_weather_by_city`], then logs the resolved city
    /// name to the visitor's history.
    pub async fn lookup_and_record(
        &self,
        user_id: i32,
        query: &str,
    ) -> Result<CityWeather, LookupError> {
        let weather = self.fetch_weather_by_city(query).await?;
        self.history
            .record_search(user_id, &weather.city.name)
            .await?;
        Ok(weather)
    }
}
