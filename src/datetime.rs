//! Date/time utilities for CloudPilot.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

/// Current time as an RFC3339 string with millisecond precision.
pub fn now_rfc3339() -> String {
    to_rfc3339(&Utc::now())
}

/// Format a timestamp the way node creation times are stored.
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp (RFC3339, or `YYYY-MM-DD HH:MM:SS` taken as UTC).
pub fn parse_timestamp(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp string in the specified timezone.
///
/// # Arguments
///
/// * `datetime_str` - Timestamp accepted by [`parse_timestamp`]
/// * `timezone` - Timezone name (e.g., "Europe/Berlin", "UTC")
/// * `format` - Output format string (e.g., "%Y/%m/%d %H:%M")
///
/// # Returns
///
/// Formatted datetime string, or the original string if parsing fails.
pub fn format_datetime(datetime_str: &str, timezone: &str, format: &str) -> String {
    let Ok(tz) = timezone.parse::<Tz>() else {
        return datetime_str.to_string();
    };
    match parse_timestamp(datetime_str) {
        Some(dt) => dt.with_timezone(&tz).format(format).to_string(),
        None => datetime_str.to_string(),
    }
}

/// Format a timestamp string with the default format.
pub fn format_datetime_default(datetime_str: &str, timezone: &str) -> String {
    format_datetime(datetime_str, timezone, "%Y/%m/%d %H:%M")
}

/// Describe the distance between two instants in words ("about 2 hours").
///
/// Buckets:
/// - under 30 seconds: "less than a minute"
/// - under 45 minutes: "N minutes"
/// - under 90 minutes: "about 1 hour"
/// - under a day: "about N hours"
/// - under 42 hours: "1 day"
/// - under 30 days: "N days"
/// - under 60 days: "about N months"
/// - under a year: "N months"
/// - otherwise "about", "over" or "almost" N years
pub fn format_distance(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let seconds = (to - from).num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return format!("about {}", plural(hours, "hour"));
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return plural(days, "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("about {}", plural(months, "month"));
    }

    let months = minutes / MINUTES_IN_MONTH;
    if months < 12 {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return plural(nearest, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

/// Relative description of a stored timestamp as seen at `now`
/// ("3 days ago", or "in 2 hours" for future times).
///
/// Returns `None` if the timestamp cannot be parsed.
pub fn format_distance_to_now(datetime_str: &str, now: DateTime<Utc>) -> Option<String> {
    let dt = parse_timestamp(datetime_str)?;
    let distance = format_distance(dt, now);
    if dt > now {
        Some(format!("in {distance}"))
    } else {
        Some(format!("{distance} ago"))
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
