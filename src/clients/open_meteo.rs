//! Open-Meteo geocoding and forecast client.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::WeatherConfig;
use crate::state::build_shared_http_client;
use crate::models::weather::{City, ForecastResponse, GeocodingResponse};

const GEOCODING_API: &str = "Geocoding API";
const FORECAST_API: &str = "Forecast API";

/// Longest upstream text body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Non-2xx response, transport failure or undecodable payload
    #[error("{0}")]
    Upstream(String),

    #[error("No matching city for '{0}'")]
    NoMatch(String),

    #[error("City '{0}' has no coordinates")]
    MissingCoordinates(String),
}

#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
    result_count: u32,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client =
            build_shared_http_client(config.request_timeout_seconds, &config.user_agent)?;

        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            result_count: config.result_count,
        }
    }

    /// Candidate locations for `name`, best match first.
    pub async fn search_city(&self, name: &str) -> Result<Vec<City>, WeatherError> {
        let query = [
            ("name", name.to_string()),
            ("count", self.result_count.to_string()),
            ("format", "json".to_string()),
        ];

        let response: GeocodingResponse = self
            .get_json(GEOCODING_API, &self.geocoding_url, &query)
            .await?;

        tracing::debug!(query = name, results = response.results.len(), "Geocoding search");
        Ok(response.results)
    }

    /// Hourly temperature and weather code series for a point.
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, WeatherError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", "temperature_2m,weathercode".to_string()),
            ("timezone", "auto".to_string()),
        ];

        self.get_json(FORECAST_API, &self.forecast_url, &query)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        api: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::Upstream(format!("Error requesting {api}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = describe_failure(api, status, &body);
            tracing::warn!("{}", message);
            return Err(WeatherError::Upstream(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Upstream(format!("Invalid response from {api}: {e}")))
    }
}

/// JSON object or array bodies collapse to the status line; anything else
/// is kept as text.
fn describe_failure(api: &str, status: StatusCode, body: &str) -> String {
    let body = body.trim();
    let is_json = matches!(
        serde_json::from_str::<serde_json::Value>(body),
        Ok(serde_json::Value::Object(_) | serde_json::Value::Array(_))
    );

    if body.is_empty() || is_json {
        format!("{api} returned HTTP {}", status.as_u16())
    } else {
        let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{api} returned HTTP {}: {excerpt}", status.as_u16())
    }
}
