use crate::{
    Config,
    error::Result,
    model::{Coordinates, ForecastPayload, GeoMatch},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Remote source of geocoding results and forecasts.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Forward-geocode a free-text place name. At most one candidate is
    /// requested; an empty vector means no match.
    async fn geocode(&self, query: &str) -> Result<Vec<GeoMatch>>;

    /// Retrieve the multi-day forecast for a point.
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastPayload>;
}

/// Construct the forecast provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn ForecastProvider>> {
    let api_key = config.require_api_key()?;

    let provider = OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        config.api_base_url.clone(),
    );

    Ok(Arc::new(provider))
}
