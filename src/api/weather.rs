use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::identity::Visitor;
use super::validation::validate_city_query;
use super::{ApiError, ApiResponse, AppState, SuggestQuery, WeatherQuery};
use crate::models::weather::City;
use crate::services::CityWeather;

/// GET /api/suggest?query=
pub async fn suggest_cities(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<Visitor>,
    Query(params): Query<SuggestQuery>,
) -> Result<Json<ApiResponse<Vec<City>>>, ApiError> {
    let query = validate_city_query("query", &params.query)?;

    let suggestions = state
        .shared
        .suggestion_service
        .suggest(visitor.id, query)
        .await?;

    Ok(Json(ApiResponse::success(suggestions)))
}

/// GET /api/weather?city=
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<Visitor>,
    Query(params): Query<WeatherQuery>,
) -> Result<Json<ApiResponse<CityWeather>>, ApiError> {
    let city = validate_city_query("city", &params.city)?;

    let weather = state
        .shared
        .weather_service
        .lookup_and_record(visitor.id, city)
        .await?;

    Ok(Json(ApiResponse::success(weather)))
}
