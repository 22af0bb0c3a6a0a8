use thiserror::Error;

/// Failures of a single user action chain.
///
/// Every variant is terminal for the chain that raised it: nothing retries,
/// the dispatcher logs it and the view keeps its previous content.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Current location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("City name must not be empty")]
    EmptyCityName,

    #[error("Unknown city '{0}'")]
    UnknownCity(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ForecastError {
    /// Short machine-friendly name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::LocationUnavailable(_) => "location_unavailable",
            ForecastError::EmptyCityName => "empty_city_name",
            ForecastError::UnknownCity(_) => "unknown_city",
            ForecastError::Network(_) => "network",
            ForecastError::Render(_) => "render",
            ForecastError::Storage(_) => "storage",
        }
    }
}

pub type Result<T, E = ForecastError> = std::result::Result<T, E>;
