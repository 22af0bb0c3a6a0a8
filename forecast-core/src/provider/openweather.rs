use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    error::{ForecastError, Result},
    model::{Coordinates, ForecastPayload, GeoMatch},
};

use super::ForecastProvider;

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// OpenWeatherMap geocoding + 5-day/3-hour forecast.
///
/// No `units` parameter is sent, so temperatures arrive in Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                ForecastError::Network(format!("Failed to send {what} request to OpenWeather: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ForecastError::Network(format!("Failed to read OpenWeather {what} response body: {e}"))
        })?;

        tracing::debug!(%status, what, body = %truncate_body(&body), "OpenWeather response");

        if !status.is_success() {
            return Err(ForecastError::Network(format!(
                "OpenWeather {what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ForecastError::Network(format!("Failed to parse OpenWeather {what} JSON: {e}"))
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &str) -> Result<Vec<GeoMatch>> {
        self.get_json(GEOCODE_PATH, &[("q", query), ("limit", "1")], "geocoding")
            .await
    }

    async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastPayload> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let payload: ForecastPayload = self
            .get_json(FORECAST_PATH, &[("lat", lat.as_str()), ("lon", lon.as_str())], "forecast")
            .await?;

        tracing::debug!(
            city = %payload.city.name,
            samples = payload.list.len(),
            "Fetched forecast"
        );

        Ok(payload)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::with_base_url("KEY".into(), server.uri())
    }

    #[tokio::test]
    async fn geocode_sends_limit_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("q", "Paris"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let matches = provider(&server).geocode("Paris").await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].coordinates(), Coordinates::new(48.85, 2.35));
        assert_eq!(matches[0].country.as_deref(), Some("FR"));
    }

    #[tokio::test]
    async fn forecast_passes_coordinates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": {"name": "Paris", "country": "FR", "timezone": 3600},
                "list": [{
                    "dt": 1700000000,
                    "main": {"temp": 285.0, "humidity": 60},
                    "wind": {"speed": 3.5},
                    "weather": [{"icon": "10d", "description": "light rain"}]
                }]
            })))
            .mount(&server)
            .await;

        let payload = provider(&server)
            .fetch_forecast(Coordinates::new(48.85, 2.35))
            .await
            .unwrap();

        assert_eq!(payload.city.name, "Paris");
        assert_eq!(payload.city.timezone, Some(3600));
        assert_eq!(payload.list.len(), 1);
        assert_eq!(payload.list[0].condition_code(), Some("10d"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"cod": 401, "message": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_forecast(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::Network(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_forecast(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::Network(_)));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
