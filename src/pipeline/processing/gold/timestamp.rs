use chrono::{DateTime, NaiveDate, Utc};

/// Interpret `value` as seconds since the Unix epoch (UTC).
///
/// Integer and decimal text are accepted; surrounding whitespace is ignored.
/// Returns `None` for empty, non-numeric, non-finite or out-of-range input.
pub fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(secs) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }

    let float: f64 = trimmed.parse().ok()?;
    if !float.is_finite() || float < i64::MIN as f64 || float >= i64::MAX as f64 {
        return None;
    }
    let secs = float.floor();
    let nanos = ((float - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

/// Calendar date of an epoch value, see [`parse_epoch_seconds`].
pub fn epoch_to_date(value: &str) -> Option<NaiveDate> {
    parse_epoch_seconds(value).map(|dt| dt.date_naive())
}
