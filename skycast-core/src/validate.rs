use crate::{
    error::ValidationError,
    model::{Mode, Query},
};

/// Minimum number of characters in a searchable city name.
pub const MIN_CITY_LEN: usize = 2;

fn is_allowed(c: char) -> bool {
    c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | ',' | '.' | '\'')
}

/// Strip every character outside the allowed set.
///
/// Applied live on each input event, so the user only ever sees the cleaned value.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| is_allowed(*c)).collect()
}

/// Sanitize and trim `raw`, then check its length.
pub fn validate(raw: &str, mode: Mode) -> Result<Query, ValidationError> {
    let cleaned = sanitize(raw);
    let city = cleaned.trim();

    if city.is_empty() {
        return Err(ValidationError::Empty);
    }
    if city.chars().count() < MIN_CITY_LEN {
        return Err(ValidationError::TooShort);
    }

    Ok(Query::new(city.to_string(), mode))
}
