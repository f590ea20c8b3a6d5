use crate::{
    error::{SearchError, TransportError},
    model::{CurrentWeather, DayForecast, Forecast, Query, WeatherResult},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Debug;

pub mod http;

pub use http::HttpWeatherClient;

/// Raw response from the weather endpoint: status code plus the unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin seam over `GET /api/weather`.
///
/// Implementations return `Err` only when no response was obtained at all;
/// every received response, whatever its status, is an `Ok`.
#[async_trait]
pub trait WeatherApiClient: Send + Sync + Debug {
    async fn fetch(&self, query: &Query) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCurrent {
    city: String,
    country: String,
    temperature: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
    #[serde(default)]
    wind_speed: f64,
    /// Meters; zero means unknown.
    #[serde(default)]
    visibility: Option<f64>,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WireDay {
    date: NaiveDate,
    temperature: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
    #[serde(default)]
    wind_speed: f64,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WireForecast {
    city: String,
    country: String,
    forecasts: Vec<WireDay>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WirePayload {
    Current(WireCurrent),
    Forecast(WireForecast),
}

impl From<WireCurrent> for CurrentWeather {
    fn from(w: WireCurrent) -> Self {
        CurrentWeather {
            city: w.city,
            country: w.country,
            temperature_c: w.temperature,
            feels_like_c: w.feels_like,
            humidity_pct: w.humidity,
            pressure_hpa: w.pressure,
            wind_speed_ms: w.wind_speed,
            visibility_km: w.visibility.filter(|m| *m > 0.0).map(|m| m / 1000.0),
            description: w.description,
            icon: w.icon,
        }
    }
}

impl From<WireDay> for DayForecast {
    fn from(w: WireDay) -> Self {
        DayForecast {
            date: w.date,
            temperature_c: w.temperature,
            feels_like_c: w.feels_like,
            humidity_pct: w.humidity,
            pressure_hpa: w.pressure,
            wind_speed_ms: w.wind_speed,
            description: w.description,
            icon: w.icon,
        }
    }
}

/// Turn a received response into a result for `query`.
///
/// An `error` field in the body wins over the status code. Non-2xx responses
/// without one are classified by status. A 2xx body is decoded according to
/// its `type` tag, which must agree with the mode that was requested.
pub fn interpret(query: &Query, response: &ApiResponse) -> Result<WeatherResult, SearchError> {
    let app_error = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty());
    if let Some(message) = app_error {
        return Err(SearchError::Application(message));
    }

    if !response.is_success() {
        return Err(SearchError::from_status(response.status, query.city()));
    }

    let payload: WirePayload = serde_json::from_str(&response.body)
        .map_err(|e| SearchError::Malformed(e.to_string()))?;

    let result = match payload {
        WirePayload::Current(current) => WeatherResult::Current(current.into()),
        WirePayload::Forecast(forecast) => WeatherResult::Forecast(Forecast {
            city: forecast.city,
            country: forecast.country,
            days: forecast.forecasts.into_iter().map(DayForecast::from).collect(),
        }),
    };

    if result.mode() != query.mode() {
        return Err(SearchError::Malformed(format!(
            "requested {} weather but received {}",
            query.mode(),
            result.mode()
        )));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Mode, validate::validate};
    use serde_json::json;

    fn current_body() -> String {
        json!({
            "type": "current",
            "city": "Paris",
            "country": "FR",
            "temperature": 15.6,
            "feels_like": 14.2,
            "humidity": 72,
            "pressure": 1013,
            "wind_speed": 5.0,
            "visibility": 10000,
            "description": "Light rain",
            "icon": "10d"
        })
        .to_string()
    }

    #[test]
    fn decodes_current_weather() {
        let query = validate("Paris", Mode::Current).unwrap();
        let result = interpret(&query, &ApiResponse::new(200, current_body())).unwrap();

        let WeatherResult::Current(current) = result else {
            panic!("expected current weather");
        };
        assert_eq!(current.city, "Paris");
        assert_eq!(current.country, "FR");
        assert_eq!(current.pressure_hpa, 1013);
        assert_eq!(current.visibility_km, Some(10.0));
    }

    #[test]
    fn missing_visibility_decodes_as_none() {
        let query = validate("Paris", Mode::Current).unwrap();
        let body = json!({
            "type": "current", "city": "Paris", "country": "FR",
            "temperature": 1.0, "feels_like": 1.0, "humidity": 50, "pressure": 1000,
            "wind_speed": 1.0, "visibility": null, "description": "Fog", "icon": "50d"
        });
        let result = interpret(&query, &ApiResponse::new(200, body.to_string())).unwrap();

        let WeatherResult::Current(current) = result else {
            panic!("expected current weather");
        };
        assert_eq!(current.visibility_km, None);
    }

    #[test]
    fn zero_visibility_decodes_as_none() {
        let query = validate("Paris", Mode::Current).unwrap();
        let body = json!({
            "type": "current", "city": "Paris", "country": "FR",
            "temperature": 1.0, "feels_like": 1.0, "humidity": 50, "pressure": 1000,
            "wind_speed": 1.0, "visibility": 0, "description": "Fog", "icon": "50d"
        });
        let result = interpret(&query, &ApiResponse::new(200, body.to_string())).unwrap();

        let WeatherResult::Current(current) = result else {
            panic!("expected current weather");
        };
        assert_eq!(current.visibility_km, None);
        assert_eq!(crate::display::visibility(current.visibility_km), "N/A");
    }

    #[test]
    fn empty_error_field_is_ignored() {
        let query = validate("Paris", Mode::Current).unwrap();

        let body = json!({ "error": "" }).to_string();
        let err = interpret(&query, &ApiResponse::new(404, body)).unwrap_err();
        assert_eq!(err, SearchError::NotFound { city: "Paris".into() });

        let mut ok_body: serde_json::Value = serde_json::from_str(&current_body()).unwrap();
        ok_body["error"] = json!("");
        let result = interpret(&query, &ApiResponse::new(200, ok_body.to_string())).unwrap();
        assert_eq!(result.city(), "Paris");
    }

    #[test]
    fn decodes_forecast_days_in_order() {
        let query = validate("Oslo", Mode::Forecast).unwrap();
        let days: Vec<_> = (19..24)
            .map(|d| {
                json!({
                    "date": format!("2026-10-{d}"),
                    "temperature": 4.0, "feels_like": 1.5, "humidity": 80,
                    "pressure": 1005, "wind_speed": 3.2,
                    "description": "Cloudy", "icon": "04d"
                })
            })
            .collect();
        let body = json!({ "type": "forecast", "city": "Oslo", "country": "NO", "forecasts": days });

        let result = interpret(&query, &ApiResponse::new(200, body.to_string())).unwrap();
        let WeatherResult::Forecast(forecast) = result else {
            panic!("expected forecast");
        };
        assert_eq!(forecast.days.len(), 5);
        assert_eq!(forecast.days[0].date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(forecast.days[4].date, NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
    }

    #[test]
    fn error_field_wins_over_status() {
        let query = validate("Paris", Mode::Current).unwrap();
        let body = json!({ "error": "Invalid or missing API key" }).to_string();

        for status in [200, 401, 404, 500] {
            let err = interpret(&query, &ApiResponse::new(status, body.clone())).unwrap_err();
            assert_eq!(err, SearchError::Application("Invalid or missing API key".into()));
        }
    }

    #[test]
    fn non_success_without_error_body_is_classified_by_status() {
        let query = validate("Atlantis", Mode::Current).unwrap();

        let err = interpret(&query, &ApiResponse::new(404, "")).unwrap_err();
        assert_eq!(err, SearchError::NotFound { city: "Atlantis".into() });

        let err = interpret(&query, &ApiResponse::new(429, "<html>slow down</html>")).unwrap_err();
        assert_eq!(err, SearchError::RateLimited);
    }

    #[test]
    fn mismatched_type_is_malformed() {
        let query = validate("Paris", Mode::Forecast).unwrap();
        let err = interpret(&query, &ApiResponse::new(200, current_body())).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }

    #[test]
    fn undecodable_success_is_malformed() {
        let query = validate("Paris", Mode::Current).unwrap();
        let err = interpret(&query, &ApiResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }
}
