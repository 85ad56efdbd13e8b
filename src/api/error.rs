use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{HistoryError, LookupError, SuggestError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ExternalApiError { service, message } => {
                write!(f, "{service} error: {message}")
            }
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code and the message shown to the client.
    pub(crate) fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (StatusCode::BAD_GATEWAY, message.clone())
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Database(msg) => Self::DatabaseError(msg),
            HistoryError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<SuggestError> for ApiError {
    fn from(err: SuggestError) -> Self {
        match err {
            SuggestError::Upstream(e) => Self::open_meteo_error(e.to_string()),
            SuggestError::History(e) => e.into(),
        }
    }
}

/// Any failed weather lookup is reported as "not found".
impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Weather(e) => Self::NotFound(e.to_string()),
            LookupError::History(e) => e.into(),
        }
    }
}

impl ApiError {
    pub fn open_meteo_error(msg: impl Into<String>) -> Self {
        Self::ExternalApiError {
            service: "Open-Meteo".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::open_meteo::WeatherError;

    #[test]
    fn test_upstream_suggest_failure_is_bad_gateway() {
        let err: ApiError =
            SuggestError::Upstream(WeatherError::Upstream("Geocoding API returned HTTP 500: Oops".into()))
                .into();
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(message.contains("Oops"));
    }

    #[test]
    fn test_weather_failure_is_not_found() {
        let err: ApiError = LookupError::Weather(WeatherError::NoMatch("Nowhere".into())).into();
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "No matching city for 'Nowhere'");
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err: ApiError = HistoryError::Database("no such table: users".into()).into();
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "A database error occurred");
    }
}
