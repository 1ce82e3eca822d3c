//! Query parameter validation.
//!
//! Every check returns the `ApiError` the client should see, so handlers can
//! bail out with `?` before any upstream call is made.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::http::response::ApiError;

static FLIGHT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z]{2,3}\d{1,4}[A-Z]?$").expect("valid flight regex"));

static AIRPORT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z]{3,4}$").expect("valid airport regex"));

/// Trimmed, non-empty value or `None`.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Alphabetic airline designator plus number, e.g. `AA123` or `TAM3054`.
pub fn is_flight_number(value: &str) -> bool {
    FLIGHT_NUMBER.is_match(value)
}

/// IATA (3 letters) or ICAO (4 letters) airport code.
pub fn is_airport_code(value: &str) -> bool {
    AIRPORT_CODE.is_match(value)
}

/// Parse a `limit` parameter, defaulting when absent and enforcing `1..=max`.
pub fn parse_limit(raw: Option<&str>, default: usize, max: usize) -> Result<usize, ApiError> {
    let Some(raw) = present(raw) else {
        return Ok(default.min(max));
    };
    match raw.parse::<usize>() {
        Ok(limit) if (1..=max).contains(&limit) => Ok(limit),
        _ => Err(ApiError::bad_request(
            "INVALID_LIMIT",
            format!("Limit must be a number between 1 and {max}"),
        )),
    }
}

/// Boolean query flag. Only explicit truthy spellings enable it.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        present(raw).map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "1" | "yes" | "on")
    )
}
