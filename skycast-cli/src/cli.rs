use std::{sync::Arc, time::Instant};

use anyhow::{Context, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use skycast_core::{
    CitySelector, Config, FileStore, HttpWeatherClient, Mode, RecentCityStore, SearchOrchestrator,
    SubmitError, WeatherResult,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 5-day forecasts by city")]
pub struct Cli {
    /// Override the configured weather API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API base URL and default mode.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "London" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Shorthand for `--mode forecast`.
        #[arg(long, conflicts_with = "mode")]
        forecast: bool,

        /// "current" or "forecast"; defaults to the configured mode.
        #[arg(long)]
        mode: Option<String>,
    },

    /// List recently searched cities.
    Recent {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Search again for a recent city, by its number in `recent` or by name.
    Again {
        selector: String,
    },

    /// Start an interactive search session.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(url) = self.base_url {
            config.set_api_base_url(url);
        }

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, forecast, mode } => {
                let mut orch = build_orchestrator(&config)?;
                let mode = match (forecast, mode) {
                    (true, _) => Mode::Forecast,
                    (false, Some(m)) => Mode::try_from(m.as_str())?,
                    (false, None) => orch.mode(),
                };
                orch.set_mode(mode);

                let outcome = orch.submit(&city.join(" ")).await;
                finish(outcome)
            }
            Command::Recent { clear } => {
                let mut recent = open_recent(&config)?;
                if clear {
                    recent.clear();
                    println!("Recent searches cleared.");
                } else {
                    print!("{}", render::recent_cities(recent.cities()));
                }
                Ok(())
            }
            Command::Again { selector } => {
                let mut orch = build_orchestrator(&config)?;
                let outcome = orch
                    .search_recent(parse_selector(&selector))
                    .await
                    .ok_or_else(|| anyhow!("No recent city matches '{selector}'. See `skycast recent`."))?;
                finish(outcome)
            }
            Command::Interactive => interactive(build_orchestrator(&config)?).await,
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let base_url = Text::new("Weather API base URL:")
        .with_default(config.api_base_url())
        .prompt()
        .context("Configuration cancelled")?;
    config.set_api_base_url(base_url);

    let starting = config.default_mode()?;
    let modes: Vec<Mode> = Mode::all().to_vec();
    let cursor = modes.iter().position(|m| *m == starting).unwrap_or(0);
    let mode = Select::new("Default mode:", modes)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Configuration cancelled")?;
    config.set_default_mode(mode);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn open_recent(config: &Config) -> anyhow::Result<RecentCityStore> {
    let dir = config.data_dir()?;
    Ok(RecentCityStore::open(Box::new(FileStore::new(dir))))
}

fn build_orchestrator(config: &Config) -> anyhow::Result<SearchOrchestrator> {
    let client = HttpWeatherClient::new(config.api_base_url(), config.timeout())?;
    let recent = open_recent(config)?;
    Ok(SearchOrchestrator::new(Arc::new(client), recent, config.default_mode()?))
}

/// "3" picks the third entry shown by `recent`; anything else is a name.
fn parse_selector(raw: &str) -> CitySelector<'_> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => CitySelector::Index(n - 1),
        _ => CitySelector::Name(raw),
    }
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

fn finish(outcome: Result<WeatherResult, SubmitError>) -> anyhow::Result<()> {
    match outcome {
        Ok(result) => {
            print!("{}", render::weather(&result, today()));
            Ok(())
        }
        Err(err) => Err(anyhow!(err.message())),
    }
}

const SESSION_HELP: &str =
    ":current, :forecast switch mode | :recent lists | :N or :name searches a recent city | :clear | :quit";

async fn interactive(mut orch: SearchOrchestrator) -> anyhow::Result<()> {
    print!("{}", render::recent_cities(orch.recent().cities()));

    loop {
        let help = match orch.visible_error(Instant::now()) {
            Some(message) => format!("⚠ {message}"),
            None => format!("mode: {} | {SESSION_HELP}", orch.mode()),
        };

        let line = match Text::new("City:").with_help_message(&help).prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            let cleaned = orch.sanitize_input(line);
            show(orch.submit(&cleaned).await);
            continue;
        };

        match command.trim() {
            "q" | "quit" | "exit" => break,
            "recent" => print!("{}", render::recent_cities(orch.recent().cities())),
            "clear" => orch.clear(),
            other => match Mode::try_from(other) {
                Ok(mode) => {
                    if let Some(outcome) = orch.switch_mode(mode).await {
                        show(outcome.map_err(SubmitError::from));
                    } else {
                        println!("Mode set to {mode}.");
                    }
                }
                Err(_) => match orch.search_recent(parse_selector(other)).await {
                    Some(outcome) => show(outcome),
                    None => println!("No recent city matches '{other}'."),
                },
            },
        }
    }

    Ok(())
}

fn show(outcome: Result<WeatherResult, SubmitError>) {
    match outcome {
        Ok(result) => print!("{}", render::weather(&result, today())),
        Err(err) => {
            tracing::debug!(error = %err, "search failed");
            eprintln!("{}", err.message());
        }
    }
}
