use chrono::{DateTime, Months, NaiveDate, Utc};

use super::error::EngineError;

/// Window applied when the caller gives no `--since` date.
pub const DEFAULT_WINDOW_MONTHS: u32 = 6;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve the `since` cut-off to a Unix timestamp.
///
/// `Some` must be a `YYYY-MM-DD` calendar date and resolves to midnight UTC
/// of that day. `None` resolves to [`DEFAULT_WINDOW_MONTHS`] before `now`.
pub fn resolve_since(since: Option<&str>, now: DateTime<Utc>) -> Result<i64, EngineError> {
    match since {
        Some(s) => parse_date(s),
        None => Ok(default_since(now)),
    }
}

fn default_since(now: DateTime<Utc>) -> i64 {
    now.checked_sub_months(Months::new(DEFAULT_WINDOW_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .timestamp()
}

fn parse_date(s: &str) -> Result<i64, EngineError> {
    let invalid = |reason: &str| EngineError::Configuration {
        value: s.to_string(),
        reason: reason.to_string(),
    };

    // chrono accepts single-digit months and days; the format is strict.
    if !has_date_shape(s) {
        return Err(invalid("expected format YYYY-MM-DD"));
    }

    let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| invalid(&e.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| invalid("date has no midnight"))?;
    Ok(midnight.and_utc().timestamp())
}

fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Format a timestamp as a `YYYY-MM-DD` date for messages.
pub fn format_date(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
#[path = "since_test.rs"]
mod tests;
