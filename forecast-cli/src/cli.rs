use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    Command as Action, Config, Controller, Coordinates, FileStore, Outcome, SearchHistory,
};
use inquire::{Confirm, CustomType, InquireError, Text};

use crate::terminal::TerminalSurface;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Five-day weather forecast")]
pub struct Cli {
    /// Log debug detail to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key and, optionally, a fixed home location.
    Configure,

    /// Forecast for the current location.
    Here,

    /// Forecast for a city; saved to history on success.
    Search {
        /// City name. Empty or absent means the current location.
        city: Option<String>,
    },

    /// List previously searched cities.
    History,

    /// Forecast for a history entry, by its number.
    Recall {
        /// 1-based position as shown by `forecast history`.
        index: usize,
    },

    /// Interactive session: current location first, then one search per line.
    Shell,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::History => {
                let config = Config::load()?;
                history_for(&config)?.load_and_render(&TerminalSurface)?;
                Ok(())
            }
            Command::Here => {
                let controller = controller()?;
                finish(controller.dispatch(Action::PageLoad).await)
            }
            Command::Search { city } => {
                let controller = controller()?;
                controller.form().set(city.unwrap_or_default());
                let action = controller.submit_command();
                finish(controller.dispatch(action).await)
            }
            Command::Recall { index } => {
                let controller = controller()?;
                let city = history_entry(controller.history(), index)?;
                finish(controller.dispatch(Action::ActivateHistory(city)).await)
            }
            Command::Shell => shell(Arc::new(controller()?)).await,
        }
    }
}

fn controller() -> anyhow::Result<Controller> {
    let config = Config::load()?;
    Controller::from_config(&config, Arc::new(TerminalSurface))
}

fn history_for(config: &Config) -> anyhow::Result<SearchHistory> {
    Ok(SearchHistory::new(Box::new(FileStore::new(
        config.history_file_path()?,
    ))))
}

fn history_entry(history: &SearchHistory, index: usize) -> anyhow::Result<String> {
    let cities = history.load()?;
    index
        .checked_sub(1)
        .and_then(|i| cities.get(i))
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "No history entry #{index} ({} stored).\n\
                 Hint: run `forecast history` to list them.",
                cities.len()
            )
        })
}

/// The failure was already logged by the dispatcher; surface it as the exit status.
fn finish(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Rendered(_) | Outcome::Superseded => Ok(()),
        Outcome::Failed(err) => Err(err.into()),
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Text::new("OpenWeatherMap API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let fixed_home = Confirm::new("Use a fixed home location instead of IP lookup?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Failed to read answer")?;

    let home = if fixed_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a decimal number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a decimal number")
            .prompt()?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    };
    config.set_home(home);

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

enum ShellInput {
    Quit,
    ShowHistory,
    Recall(usize),
    Search(String),
}

fn parse_shell_input(line: &str) -> anyhow::Result<ShellInput> {
    let line = line.trim();
    match line {
        ":q" | ":quit" => Ok(ShellInput::Quit),
        ":h" | ":history" => Ok(ShellInput::ShowHistory),
        _ => match line.strip_prefix(':') {
            Some(n) => n
                .trim()
                .parse()
                .map(ShellInput::Recall)
                .map_err(|_| anyhow!("Unknown shell command '{line}'")),
            None => Ok(ShellInput::Search(line.to_string())),
        },
    }
}

/// Each action runs as its own task, so a slow lookup never blocks the prompt.
async fn shell(controller: Arc<Controller>) -> anyhow::Result<()> {
    spawn_action(&controller, Action::PageLoad);

    loop {
        let line = tokio::task::spawn_blocking(|| {
            Text::new("city>")
                .with_help_message("empty = current location, :N = history entry, :h = history, :q = quit")
                .prompt()
        })
        .await?;

        let line = match line {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match parse_shell_input(&line) {
            Ok(ShellInput::Quit) => break,
            Ok(ShellInput::ShowHistory) => {
                if let Err(err) = controller.history().load_and_render(&TerminalSurface) {
                    eprintln!("{err}");
                }
            }
            Ok(ShellInput::Recall(index)) => match history_entry(controller.history(), index) {
                Ok(city) => spawn_action(&controller, Action::ActivateHistory(city)),
                Err(err) => eprintln!("{err}"),
            },
            Ok(ShellInput::Search(city)) => {
                controller.form().set(city);
                spawn_action(&controller, controller.submit_command());
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}

fn spawn_action(controller: &Arc<Controller>, action: Action) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller.dispatch(action).await;
    });
}
