//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - Input validation and the search orchestrator
//! - The client seam over the `/api/weather` endpoint and response classification
//! - The persisted recent-city list
//! - Display conversions and configuration
//!
//! It is used by `skycast-cli`, but any other front end can drive the same orchestrator.

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod storage;
pub mod validate;

pub use api::{ApiResponse, HttpWeatherClient, WeatherApiClient};
pub use config::Config;
pub use error::{SearchError, StorageError, SubmitError, TransportError, ValidationError};
pub use model::{CurrentWeather, DayForecast, Forecast, Mode, Query, WeatherResult};
pub use orchestrator::{PendingSearch, SearchOrchestrator, SettledSearch, Status};
pub use storage::{CitySelector, FileStore, KeyValueStore, MemoryStore, RecentCityStore};
