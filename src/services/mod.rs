pub mod history_service;
pub use history_service::{HistoryError, HistoryService};

pub mod history_service_impl;
pub use history_service_impl::SeaOrmHistoryService;

pub mod suggest;
pub use suggest::{SuggestError, SuggestionService};

pub mod weather;
pub use weather::{CityWeather, LookupError, WeatherService};
