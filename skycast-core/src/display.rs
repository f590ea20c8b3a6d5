//! User-facing unit conversions and labels.

use chrono::{Days, NaiveDate};

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Round half toward positive infinity, so `-2.5` becomes `-2` and `2.5` becomes `3`.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Whole degrees Celsius, e.g. `16°C`.
pub fn temperature(celsius: f64) -> String {
    format!("{}°C", round_half_up(celsius))
}

/// Wind speed converted from m/s to km/h with one decimal, e.g. `18.0 km/h`.
pub fn wind_kmh(meters_per_sec: f64) -> String {
    format!("{:.1} km/h", meters_per_sec * 3.6)
}

pub fn visibility(km: Option<f64>) -> String {
    match km {
        Some(km) => format!("{km:.1} km"),
        None => "N/A".to_string(),
    }
}

pub fn humidity(pct: u8) -> String {
    format!("{pct}%")
}

pub fn pressure(hpa: u32) -> String {
    format!("{hpa} hPa")
}

/// "Today", "Tomorrow", or a short date such as "Tue, Oct 20".
pub fn forecast_day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.checked_add_days(Days::new(1)) == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

pub fn current_icon_url(icon: &str) -> String {
    format!("{ICON_BASE}/{icon}@4x.png")
}

pub fn forecast_icon_url(icon: &str) -> String {
    format!("{ICON_BASE}/{icon}@2x.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_rounds_to_whole_degrees() {
        assert_eq!(temperature(15.6), "16°C");
        assert_eq!(temperature(15.4), "15°C");
        assert_eq!(temperature(2.5), "3°C");
        assert_eq!(temperature(-2.5), "-2°C");
        assert_eq!(temperature(-0.4), "0°C");
    }

    #[test]
    fn wind_is_converted_to_kmh() {
        assert_eq!(wind_kmh(5.0), "18.0 km/h");
        assert_eq!(wind_kmh(0.0), "0.0 km/h");
        assert_eq!(wind_kmh(3.2), "11.5 km/h");
    }

    #[test]
    fn visibility_has_one_decimal_or_na() {
        assert_eq!(visibility(Some(10.0)), "10.0 km");
        assert_eq!(visibility(Some(2.345)), "2.3 km");
        assert_eq!(visibility(None), "N/A");
    }

    #[test]
    fn simple_units() {
        assert_eq!(humidity(81), "81%");
        assert_eq!(pressure(1013), "1013 hPa");
    }

    #[test]
    fn day_labels() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        assert_eq!(forecast_day_label(today, today), "Today");
        assert_eq!(forecast_day_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            forecast_day_label(NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(), today),
            "Wed, Oct 21"
        );
    }

    #[test]
    fn icon_urls() {
        assert_eq!(current_icon_url("10d"), "https://openweathermap.org/img/wn/10d@4x.png");
        assert_eq!(forecast_icon_url("04n"), "https://openweathermap.org/img/wn/04n@2x.png");
    }
}
