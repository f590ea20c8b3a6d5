use chrono::NaiveDate;
use skycast_core::{CurrentWeather, Forecast, WeatherResult, display};

pub fn weather(result: &WeatherResult, today: NaiveDate) -> String {
    match result {
        WeatherResult::Current(current) => current_weather(current),
        WeatherResult::Forecast(forecast) => forecast_days(forecast, today),
    }
}

fn current_weather(w: &CurrentWeather) -> String {
    [
        format!("{}, {}", w.city, w.country),
        format!("{}  {}", display::temperature(w.temperature_c), w.description),
        format!("  Feels like  {}", display::temperature(w.feels_like_c)),
        format!("  Humidity    {}", display::humidity(w.humidity_pct)),
        format!("  Pressure    {}", display::pressure(w.pressure_hpa)),
        format!("  Wind speed  {}", display::wind_kmh(w.wind_speed_ms)),
        format!("  Visibility  {}", display::visibility(w.visibility_km)),
        format!("  Icon        {}", display::current_icon_url(&w.icon)),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

fn forecast_days(f: &Forecast, today: NaiveDate) -> String {
    let mut out = format!("5-Day Forecast for {}, {}\n", f.city, f.country);

    for day in &f.days {
        out.push_str(&format!(
            "  {:<12} {:>5}  {}\n",
            display::forecast_day_label(day.date, today),
            display::temperature(day.temperature_c),
            day.description
        ));
        out.push_str(&format!(
            "               feels like {}, {} humidity, {} wind, {}\n",
            display::temperature(day.feels_like_c),
            display::humidity(day.humidity_pct),
            display::wind_kmh(day.wind_speed_ms),
            display::pressure(day.pressure_hpa)
        ));
    }
    out
}

/// Numbered list of recent cities, or a hint when there are none.
pub fn recent_cities(cities: &[String]) -> String {
    if cities.is_empty() {
        return "No recent searches yet. Try London, New York or Tokyo.\n".to_string();
    }

    let numbered: String = cities
        .iter()
        .enumerate()
        .map(|(i, city)| format!("  {}. {}\n", i + 1, city))
        .collect();
    format!("Recent searches:\n{numbered}")
}
