//! Projection of a forecast payload into the current-conditions and
//! five-day regions.

use chrono::{
    DateTime, FixedOffset,
    format::{Item, StrftimeItems},
};
use std::fmt::Write as _;

use crate::{
    Config,
    config::DEFAULT_DATE_FORMAT,
    error::{ForecastError, Result},
    icon::map_condition_to_icon,
    model::{ForecastPayload, ForecastSample},
};

pub const FORECAST_DAYS: usize = 5;

/// The forecast API reports at 3-hour resolution.
pub const SAMPLES_PER_DAY: usize = 8;

const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// One-decimal rendering with exact ties rounded away from zero.
///
/// `format!("{:.1}")` settles exact binary ties (x.25, x.75) to even; the
/// displayed values follow the away-from-zero convention instead. All other
/// values round to the nearest decimal of their exact binary value either way.
pub fn format_one_decimal(value: f64) -> String {
    let is_tie = (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if is_tie {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{value:.1}")
    }
}

/// The rendered surface: three regions, each fully replaced on update.
pub trait Surface: Send + Sync {
    fn show_current(&self, view: &CurrentConditions);
    fn show_forecast(&self, days: &[DaySummary]);
    fn show_history(&self, cities: &[String]);
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub location: String,
    pub country: String,
    pub date: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<&'static str>,
}

impl CurrentConditions {
    pub fn temperature(&self) -> String {
        format_one_decimal(self.temperature_c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// Position of the projected sample in the payload.
    pub sample_index: usize,
    pub date: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub icon: Option<&'static str>,
}

impl DaySummary {
    pub fn temperature(&self) -> String {
        format_one_decimal(self.temperature_c)
    }
}

/// What a call to [`Renderer::render`] put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub current_shown: bool,
    pub days_shown: usize,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    date_format: String,
}

impl Renderer {
    /// Falls back to the default date format when `date_format` is not a
    /// valid strftime pattern.
    pub fn new(date_format: &str) -> Self {
        let valid = !StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error));
        let date_format = if valid {
            date_format.to_string()
        } else {
            tracing::warn!(date_format, "Invalid date format, using {DEFAULT_DATE_FORMAT}");
            DEFAULT_DATE_FORMAT.to_string()
        };

        Self { date_format }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.date_format)
    }

    /// Write both regions. Projection failures are logged, never returned.
    pub fn render(&self, payload: &ForecastPayload, surface: &dyn Surface) -> RenderSummary {
        let current = match self.project_current(payload) {
            Ok(view) => view,
            Err(err) => {
                tracing::error!(error = %err, "Failed to render current conditions");
                return RenderSummary::default();
            }
        };
        surface.show_current(&current);

        let days = self.project_forecast(payload);
        surface.show_forecast(&days);

        RenderSummary {
            current_shown: true,
            days_shown: days.len(),
        }
    }

    pub fn project_current(&self, payload: &ForecastPayload) -> Result<CurrentConditions> {
        let sample = payload
            .list
            .first()
            .ok_or_else(|| ForecastError::Render("forecast contains no samples".into()))?;

        Ok(CurrentConditions {
            location: payload.city.name.clone(),
            country: payload.city.country.clone(),
            date: self.format_date(sample.dt, payload.city.timezone)?,
            temperature_c: celsius(sample.main.temp),
            humidity_pct: sample.main.humidity,
            wind_speed_mps: sample.wind.as_ref().map(|w| w.speed),
            description: sample.description().map(str::to_string),
            icon: icon_for(sample),
        })
    }

    /// One summary per following day, taken from samples `8, 16, .., 40`.
    /// Days beyond the end of the payload are left out.
    pub fn project_forecast(&self, payload: &ForecastPayload) -> Vec<DaySummary> {
        (1..=FORECAST_DAYS)
            .map(|day| day * SAMPLES_PER_DAY)
            .filter_map(|index| {
                let sample = payload.list.get(index)?;
                match self.project_day(index, sample, payload.city.timezone) {
                    Ok(summary) => Some(summary),
                    Err(err) => {
                        tracing::warn!(index, error = %err, "Skipping forecast day");
                        None
                    }
                }
            })
            .collect()
    }

    fn project_day(
        &self,
        index: usize,
        sample: &ForecastSample,
        timezone: Option<i32>,
    ) -> Result<DaySummary> {
        Ok(DaySummary {
            sample_index: index,
            date: self.format_date(sample.dt, timezone)?,
            temperature_c: celsius(sample.main.temp),
            humidity_pct: sample.main.humidity,
            icon: icon_for(sample),
        })
    }

    fn format_date(&self, unix_secs: i64, timezone: Option<i32>) -> Result<String> {
        let offset_secs = timezone.unwrap_or(0);
        let offset = FixedOffset::east_opt(offset_secs)
            .ok_or_else(|| ForecastError::Render(format!("invalid UTC offset {offset_secs}s")))?;

        let local = DateTime::from_timestamp(unix_secs, 0)
            .ok_or_else(|| ForecastError::Render(format!("timestamp {unix_secs} out of range")))?
            .with_timezone(&offset);

        let mut out = String::new();
        write!(out, "{}", local.format(&self.date_format))
            .map_err(|_| ForecastError::Render(format!("cannot format timestamp {unix_secs}")))?;
        Ok(out)
    }
}

fn icon_for(sample: &ForecastSample) -> Option<&'static str> {
    let code = sample.condition_code()?;
    let icon = map_condition_to_icon(code);
    if icon.is_none() {
        tracing::debug!(code, "No icon for condition code");
    }
    icon
}
