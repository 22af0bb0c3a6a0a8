use serde::{Deserialize, Serialize};

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// One candidate returned by forward geocoding.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoMatch {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
}

impl GeoMatch {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Multi-day forecast at 3-hour resolution, as returned by the forecast API.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub city: City,
    pub list: Vec<ForecastSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSample {
    /// Unix seconds.
    pub dt: i64,
    pub main: SampleMain,
    #[serde(default)]
    pub wind: Option<SampleWind>,
    #[serde(default)]
    pub weather: Vec<SampleCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleMain {
    /// Kelvin.
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleWind {
    /// Metres per second.
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleCondition {
    pub icon: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ForecastSample {
    /// Condition code of the primary weather entry, if any.
    pub fn condition_code(&self) -> Option<&str> {
        self.weather.first().map(|w| w.icon.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.description.as_deref())
    }
}
