use serde::{Deserialize, Serialize};

use crate::db::{CityCount, SearchRecord};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub version: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub city_name: String,
    pub searched_at: String,
}

impl From<SearchRecord> for HistoryItem {
    fn from(record: SearchRecord) -> Self {
        Self {
            city_name: record.city_name,
            searched_at: record.searched_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsItem {
    pub city_name: String,
    pub count: i64,
}

impl From<CityCount> for StatsItem {
    fn from(row: CityCount) -> Self {
        Self {
            city_name: row.city_name,
            count: row.count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}
