use serde::{Deserialize, Serialize};

/// One candidate location from the geocoder.
///
/// Suggestions built from a visitor's own history only carry `name` and
/// `search_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// How often the current visitor searched this city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_count: Option<i64>,
}

impl City {
    #[must_use]
    pub fn from_history(name: impl Into<String>, search_count: i64) -> Self {
        Self {
            name: name.into(),
            search_count: Some(search_count),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// "Name, Region, Country" with missing parts skipped.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        parts.extend(self.admin1.as_deref().filter(|a| *a != self.name));
        parts.extend(self.country.as_deref());
        parts.join(", ")
    }
}

/// Geocoding search payload. Open-Meteo omits `results` when nothing matched.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<City>,
}

/// Hourly arrays, aligned by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastHourly {
    /// ISO 8601 local times in the forecast's timezone
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub weathercode: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub generationtime_ms: f64,
    pub utc_offset_seconds: i64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    #[serde(default)]
    pub elevation: Option<f64>,
    pub hourly: ForecastHourly,
}

impl ForecastResponse {
    /// Zips the hourly arrays into rows, stopping at the shortest array.
    #[must_use]
    pub fn readings(&self) -> Vec<HourlyReading> {
        self.hourly
            .time
            .iter()
            .zip(&self.hourly.temperature_2m)
            .zip(&self.hourly.weathercode)
            .map(|((time, &temperature), &code)| HourlyReading {
                time: time.clone(),
                temperature,
                condition: WeatherCondition::from_wmo_code(code),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyReading {
    pub time: String,
    pub temperature: f64,
    pub condition: WeatherCondition,
}

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// See: <https://open-meteo.com/en/docs#weathervariables>
    #[must_use]
    pub const fn from_wmo_code(code: i32) -> Self {
        match code {
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 | 66 | 67 => Self::Sleet,
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}
