//! Core library for the `forecast` client.
//!
//! This crate defines:
//! - Configuration handling
//! - Location resolution (geolocation and forward geocoding)
//! - The forecast provider abstraction and its OpenWeatherMap implementation
//! - Projection of forecasts into views, and the persisted search history
//! - The command dispatcher that sequences all of the above per user action
//!
//! It is used by `forecast-cli`, but the `Surface` and `KeyValueStore` seams
//! let other front-ends reuse it.

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;

pub use config::Config;
pub use controller::{Command, Controller, Outcome, SearchForm};
pub use error::ForecastError;
pub use history::{FileStore, KeyValueStore, MemoryStore, SearchHistory};
pub use location::{FixedGeolocator, Geolocator, IpGeolocator, LocationResolver};
pub use model::{Coordinates, ForecastPayload};
pub use provider::ForecastProvider;
pub use render::{CurrentConditions, DaySummary, RenderSummary, Renderer, Surface};
