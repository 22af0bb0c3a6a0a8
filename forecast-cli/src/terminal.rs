//! Terminal rendering of the three view regions.

use forecast_core::{CurrentConditions, DaySummary, Surface};

/// Prints each region to stdout as soon as it is replaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn show_current(&self, view: &CurrentConditions) {
        println!("{}", format_current(view));
    }

    fn show_forecast(&self, days: &[DaySummary]) {
        println!("{}", format_forecast(days));
    }

    fn show_history(&self, cities: &[String]) {
        println!("{}", format_history(cities));
    }
}

fn icon_suffix(icon: Option<&str>) -> String {
    icon.map(|i| format!("  [{i}]")).unwrap_or_default()
}

pub fn format_current(view: &CurrentConditions) -> String {
    let mut lines = vec![
        format!("== {}, {} =={}", view.location, view.country, icon_suffix(view.icon)),
        format!("Date: {}", view.date),
        format!("Temperature: {} °C", view.temperature()),
        format!("Humidity: {} %", view.humidity_pct),
    ];
    if let Some(speed) = view.wind_speed_mps {
        lines.push(format!("Wind Speed: {speed} m/s"));
    }
    if let Some(description) = &view.description {
        lines.push(format!("Conditions: {description}"));
    }
    lines.join("\n")
}

pub fn format_forecast(days: &[DaySummary]) -> String {
    let mut lines = vec!["-- 5-day forecast --".to_string()];
    lines.extend(days.iter().map(|day| {
        format!(
            "{:<12} {:>6} °C  {:>3} %{}",
            day.date,
            day.temperature(),
            day.humidity_pct,
            icon_suffix(day.icon)
        )
    }));
    lines.join("\n")
}

/// Entries are numbered from 1; the number is what `recall` and `:N` take.
pub fn format_history(cities: &[String]) -> String {
    if cities.is_empty() {
        return "-- history: empty --".to_string();
    }

    let mut lines = vec!["-- history --".to_string()];
    lines.extend(
        cities
            .iter()
            .enumerate()
            .map(|(i, city)| format!("[{}] {city}", i + 1)),
    );
    lines.join("\n")
}
