//! Server-rendered pages.

use askama::Template;
use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::identity::Visitor;
use super::validation::validate_city_query;
use super::{ApiError, AppState};
use crate::services::CityWeather;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    last_city: Option<String>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "weather.html")]
struct WeatherTemplate {
    city_name: String,
    location: String,
    timezone: String,
    rows: Vec<ForecastRow>,
}

struct ForecastRow {
    time: String,
    temperature: String,
    condition: &'static str,
}

impl From<CityWeather> for WeatherTemplate {
    fn from(weather: CityWeather) -> Self {
        let rows = weather
            .forecast
            .readings()
            .into_iter()
            .map(|reading| ForecastRow {
                time: reading.time.replace('T', " "),
                temperature: format!("{:.1}°C", reading.temperature),
                condition: reading.condition.description(),
            })
            .collect();

        Self {
            location: weather.city.display_name(),
            city_name: weather.city.name,
            timezone: weather.forecast.timezone,
            rows,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherForm {
    #[serde(default)]
    pub city: String,
}

fn render(template: &impl Template) -> Result<Html<String>, ApiError> {
    template
        .render()
        .map(Html)
        .map_err(|e| ApiError::internal(format!("Template rendering failed: {e}")))
}

async fn landing_page(
    state: &AppState,
    visitor: &Visitor,
    error: Option<String>,
) -> Result<Html<String>, ApiError> {
    let last_city = state.shared.history_service.last_city(visitor.id).await?;
    render(&IndexTemplate { last_city, error })
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<Visitor>,
) -> Result<Html<String>, ApiError> {
    landing_page(&state, &visitor, None).await
}

/// POST /weather
///
/// Failed lookups re-render the landing page with the error message and
/// the status the JSON API would have used.
pub async fn weather_page(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<Visitor>,
    Form(form): Form<WeatherForm>,
) -> Result<Response, ApiError> {
    let lookup = match validate_city_query("city", &form.city) {
        Ok(city) => state
            .shared
            .weather_service
            .lookup_and_record(visitor.id, city)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };

    match lookup {
        Ok(weather) => Ok(render(&WeatherTemplate::from(weather))?.into_response()),
        Err(err @ (ApiError::NotFound(_) | ApiError::ValidationError(_))) => {
            let (status, message) = err.status_and_message();
            let page = landing_page(&state, &visitor, Some(message)).await?;
            Ok((status, page).into_response())
        }
        Err(err) => Err(err),
    }
}
