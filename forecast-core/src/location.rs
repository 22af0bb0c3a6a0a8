//! Turning "where am I" or a city name into coordinates.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    error::{ForecastError, Result},
    model::Coordinates,
    provider::ForecastProvider,
};

/// Single-shot source of the machine's current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Fails with [`ForecastError::LocationUnavailable`] when no position can be
    /// determined.
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Always answers with the configured home location.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    home: Coordinates,
}

impl FixedGeolocator {
    pub fn new(home: Coordinates) -> Self {
        Self { home }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.home)
    }
}

/// Approximates the current position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpGeolocator {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                ForecastError::LocationUnavailable(format!("IP lookup request failed: {e}"))
            })?;

        if !res.status().is_success() {
            return Err(ForecastError::LocationUnavailable(format!(
                "IP lookup returned status {}",
                res.status()
            )));
        }

        let body: IpLookupResponse = res
            .json()
            .await
            .map_err(|e| {
                ForecastError::LocationUnavailable(format!("IP lookup parse error: {e}"))
            })?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(ForecastError::LocationUnavailable(
                body.message
                    .unwrap_or_else(|| format!("IP lookup answered '{}'", body.status)),
            )),
        }
    }
}

/// Pick the geolocation capability the config asks for.
pub fn geolocator_from_config(config: &Config) -> Arc<dyn Geolocator> {
    match config.home {
        Some(home) => Arc::new(FixedGeolocator::new(home)),
        None => Arc::new(IpGeolocator::new(config.ip_lookup_url.clone())),
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geolocator: Arc<dyn Geolocator>,
    provider: Arc<dyn ForecastProvider>,
}

impl LocationResolver {
    pub fn new(geolocator: Arc<dyn Geolocator>, provider: Arc<dyn ForecastProvider>) -> Self {
        Self {
            geolocator,
            provider,
        }
    }

    pub async fn resolve_current_location(&self) -> Result<Coordinates> {
        let coords = self.geolocator.current_position().await?;
        tracing::debug!(%coords, "Resolved current location");
        Ok(coords)
    }

    /// Forward-geocode `name`, keeping only the first match.
    pub async fn resolve_city_name(&self, name: &str) -> Result<Coordinates> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ForecastError::EmptyCityName);
        }

        let matches = self.provider.geocode(name).await?;

        let first = matches
            .first()
            .ok_or_else(|| ForecastError::UnknownCity(name.to_string()))?;

        let coords = first.coordinates();
        tracing::debug!(city = name, %coords, "Geocoded city");
        Ok(coords)
    }
}
