use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::open_meteo::OpenMeteoClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{HistoryService, SeaOrmHistoryService, SuggestionService, WeatherService};

/// Build the HTTP client every upstream call goes through.
/// Reusing it keeps connections pooled across requests.
pub(crate) fn build_shared_http_client(
    timeout_seconds: u64,
    user_agent: &str,
) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub history_service: Arc<dyn HistoryService>,

    pub suggestion_service: Arc<SuggestionService>,

    pub weather_service: Arc<WeatherService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(
            config.weather.request_timeout_seconds,
            &config.weather.user_agent,
        )?;

        let open_meteo = Arc::new(OpenMeteoClient::with_shared_client(
            http_client,
            &config.weather,
        ));

        let history_service = Arc::new(SeaOrmHistoryService::new(store.clone()))
            as Arc<dyn HistoryService>;

        let suggestion_service = Arc::new(SuggestionService::new(
            history_service.clone(),
            open_meteo.clone(),
            config.suggest.max_results,
        ));

        let weather_service = Arc::new(WeatherService::new(
            open_meteo,
            history_service.clone(),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            history_service,
            suggestion_service,
            weather_service,
        })
    }
}
