//! Command dispatcher tying user actions to resolve → fetch → render → save.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    Config,
    error::{ForecastError, Result},
    history::{FileStore, KeyValueStore, SearchHistory},
    location::{Geolocator, LocationResolver, geolocator_from_config},
    model::Coordinates,
    provider::{ForecastProvider, provider_from_config},
    render::{RenderSummary, Renderer, Surface},
};

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start-up: restore history, show the forecast for the current location.
    PageLoad,
    /// Search for the form input as it was when the action was issued.
    /// Build it with [`Controller::submit_command`].
    Submit(String),
    /// Show the forecast for a city picked from the history list.
    ActivateHistory(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::PageLoad => "page_load",
            Command::Submit(_) => "submit",
            Command::ActivateHistory(_) => "activate_history",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Rendered(RenderSummary),
    /// A newer action was dispatched before this one finished; its result was dropped.
    Superseded,
    Failed(ForecastError),
}

/// The search input field.
#[derive(Debug, Default)]
pub struct SearchForm {
    value: Mutex<String>,
}

impl SearchForm {
    pub fn set(&self, value: impl Into<String>) {
        *self.value.lock() = value.into();
    }

    pub fn value(&self) -> String {
        self.value.lock().clone()
    }

    pub fn clear(&self) {
        self.value.lock().clear();
    }

    /// Clear only if the field still holds `submitted`; a newer entry is kept.
    pub fn clear_if(&self, submitted: &str) -> bool {
        let mut value = self.value.lock();
        if *value == submitted {
            value.clear();
            true
        } else {
            false
        }
    }
}

pub struct Controller {
    resolver: LocationResolver,
    provider: Arc<dyn ForecastProvider>,
    renderer: Renderer,
    history: SearchHistory,
    surface: Arc<dyn Surface>,
    form: SearchForm,
    generation: AtomicU64,
    discard_stale_results: bool,
}

impl Controller {
    pub fn new(
        config: &Config,
        provider: Arc<dyn ForecastProvider>,
        geolocator: Arc<dyn Geolocator>,
        store: Box<dyn KeyValueStore>,
        surface: Arc<dyn Surface>,
    ) -> Self {
        Self {
            resolver: LocationResolver::new(geolocator, provider.clone()),
            provider,
            renderer: Renderer::from_config(config),
            history: SearchHistory::new(store),
            surface,
            form: SearchForm::default(),
            generation: AtomicU64::new(0),
            discard_stale_results: config.discard_stale_results,
        }
    }

    /// Wire up the OpenWeather provider, the configured geolocator and the
    /// on-disk history store.
    pub fn from_config(config: &Config, surface: Arc<dyn Surface>) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        let geolocator = geolocator_from_config(config);
        let store = FileStore::new(config.history_file_path()?);
        tracing::debug!(path = %store.path().display(), "Using history store");

        Ok(Self::new(config, provider, geolocator, Box::new(store), surface))
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    /// Snapshot the form into a submit action.
    pub fn submit_command(&self) -> Command {
        Command::Submit(self.form.value())
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Run one action to completion. Failures are logged here and reported
    /// back as [`Outcome::Failed`]; they never leave a partial history write.
    pub async fn dispatch(&self, command: Command) -> Outcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let name = command.name();
        tracing::debug!(command = name, ticket, "Dispatching");

        let result = match command {
            Command::PageLoad => self.page_load(ticket).await,
            Command::Submit(input) => self.submit(&input, ticket).await,
            Command::ActivateHistory(city) => self.activate_history(&city, ticket).await,
        };

        match result {
            Ok(outcome) => {
                tracing::debug!(command = name, ticket, ?outcome, "Action finished");
                outcome
            }
            Err(err) => {
                tracing::error!(command = name, ticket, kind = err.kind(), error = %err, "Action failed");
                Outcome::Failed(err)
            }
        }
    }

    async fn page_load(&self, ticket: u64) -> Result<Outcome> {
        if let Err(err) = self.history.load_and_render(self.surface.as_ref()) {
            tracing::warn!(error = %err, "Could not restore search history");
        }

        let coords = self.resolver.resolve_current_location().await?;
        self.show_forecast_for(coords, ticket).await
    }

    async fn submit(&self, input: &str, ticket: u64) -> Result<Outcome> {
        let city = input.trim().to_string();

        let coords = if city.is_empty() {
            self.resolver.resolve_current_location().await?
        } else {
            self.resolver.resolve_city_name(&city).await?
        };

        let outcome = self.show_forecast_for(coords, ticket).await?;

        if matches!(outcome, Outcome::Rendered(_)) && !city.is_empty() {
            self.history.append(&city, self.surface.as_ref())?;
            self.form.clear_if(input);
        }

        Ok(outcome)
    }

    async fn activate_history(&self, city: &str, ticket: u64) -> Result<Outcome> {
        let coords = self.resolver.resolve_city_name(city).await?;
        self.show_forecast_for(coords, ticket).await
    }

    async fn show_forecast_for(&self, coords: Coordinates, ticket: u64) -> Result<Outcome> {
        let payload = self.provider.fetch_forecast(coords).await?;

        if !self.is_latest(ticket) {
            tracing::info!(ticket, %coords, "Dropping superseded forecast");
            return Ok(Outcome::Superseded);
        }

        let summary = self.renderer.render(&payload, self.surface.as_ref());
        tracing::info!(
            city = %payload.city.name,
            days = summary.days_shown,
            "Rendered forecast"
        );
        Ok(Outcome::Rendered(summary))
    }

    fn is_latest(&self, ticket: u64) -> bool {
        !self.discard_stale_results || self.generation.load(Ordering::SeqCst) == ticket
    }
}
