use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Which variant of the weather query is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Current,
    Forecast,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Current => "current",
            Mode::Forecast => "forecast",
        }
    }

    pub const fn all() -> &'static [Mode] {
        &[Mode::Current, Mode::Forecast]
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Mode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "current" => Ok(Mode::Current),
            "forecast" => Ok(Mode::Forecast),
            _ => Err(anyhow::anyhow!(
                "Unknown mode '{value}'. Supported modes: current, forecast."
            )),
        }
    }
}

/// A validated search submission.
///
/// Only [`crate::validate::validate`] and the orchestrator (when re-issuing a
/// city that already succeeded) construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    city: String,
    mode: Mode,
}

impl Query {
    pub(crate) fn new(city: String, mode: Mode) -> Self {
        Self { city, mode }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_ms: f64,
    pub visibility_km: Option<f64>,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_ms: f64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    /// One entry per day, in chronological order.
    pub days: Vec<DayForecast>,
}

/// Decoded result of a successful search. Held only for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeatherResult {
    Current(CurrentWeather),
    Forecast(Forecast),
}

impl WeatherResult {
    pub fn mode(&self) -> Mode {
        match self {
            WeatherResult::Current(_) => Mode::Current,
            WeatherResult::Forecast(_) => Mode::Forecast,
        }
    }

    pub fn city(&self) -> &str {
        match self {
            WeatherResult::Current(c) => &c.city,
            WeatherResult::Forecast(f) => &f.city,
        }
    }

    pub fn country(&self) -> &str {
        match self {
            WeatherResult::Current(c) => &c.country,
            WeatherResult::Forecast(f) => &f.country,
        }
    }
}
