//! Time dimension values as advertised by capabilities documents.
//!
//! Servers publish time axes as free-form tokens: ISO 8601 dates and
//! date-times, compact `YYYYMMDD` dates, `all` / `current` keywords, and
//! `9999...` placeholders standing in for "all data". Each token becomes a
//! [`TimeEntry`] that keeps the verbatim value and, where possible, a year
//! and a one-day interval.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};

/// Literal keyword meaning "all time steps".
pub const ALL_KEYWORD: &str = "all";
/// Literal keyword meaning "latest time step".
pub const CURRENT_KEYWORD: &str = "current";
/// Prefix some servers use instead of a proper `all` token.
const ALL_DATA_SENTINEL: &str = "9999";

/// Year bucket of a time entry.
///
/// Serializes as a number for calendar years and as the keyword string
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeYear {
    Year(i32),
    All,
    Current,
}

impl Serialize for TimeYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeYear::Year(year) => serializer.serialize_i32(*year),
            TimeYear::All => serializer.serialize_str(ALL_KEYWORD),
            TimeYear::Current => serializer.serialize_str(CURRENT_KEYWORD),
        }
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// The 24 hour span starting at `start`.
    ///
    /// `None` when the end falls past the last representable instant.
    pub fn one_day(start: DateTime<Utc>) -> Option<Self> {
        let end = start.checked_add_signed(Duration::days(1))?;
        Some(Self { start, end })
    }
}

/// One selectable value of a time dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Verbatim value from the document
    pub timestamp: String,
    pub year: Option<TimeYear>,
    pub day_interval: Option<DateRange>,
}

impl TimeEntry {
    /// Classify a raw dimension value.
    ///
    /// Checks run in a fixed order: keywords, the `9999` sentinel, compact
    /// `YYYYMMDD`, ISO 8601. Anything else is kept as an opaque token with
    /// neither year nor interval.
    pub fn from_value(value: &str) -> Self {
        let (year, day_interval) = classify(value);
        Self {
            timestamp: value.to_string(),
            year,
            day_interval,
        }
    }
}

fn classify(value: &str) -> (Option<TimeYear>, Option<DateRange>) {
    if value == ALL_KEYWORD {
        return (Some(TimeYear::All), None);
    }
    if value == CURRENT_KEYWORD {
        return (Some(TimeYear::Current), None);
    }
    if value.starts_with(ALL_DATA_SENTINEL) {
        return (Some(TimeYear::All), None);
    }
    if is_compact_date(value) {
        let year = value[..4].parse().ok().map(TimeYear::Year);
        let interval = NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|ndt| DateRange::one_day(Utc.from_utc_datetime(&ndt)));
        return (year, interval);
    }
    match parse_iso8601(value) {
        Some((year, start)) => (Some(TimeYear::Year(year)), DateRange::one_day(start)),
        None => (None, None),
    }
}

fn is_compact_date(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an ISO 8601 calendar date or date-time.
///
/// Returns the calendar year as written (in the value's own offset) and the
/// instant in UTC. Zone-less date-times are taken as UTC.
pub fn parse_iso8601(s: &str) -> Option<(i32, DateTime<Utc>)> {
    // Full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some((dt.year(), dt.with_timezone(&Utc)));
    }

    // Without timezone (assume UTC)
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Some((ndt.year(), Utc.from_utc_datetime(&ndt)));
        }
    }

    // Date only, possibly with reduced precision
    let date = if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        date
    } else if is_year_month(s) {
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()?
    } else if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)?
    } else {
        return None;
    };
    let start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    Some((date.year(), start))
}

fn is_year_month(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit)
}

/// A resolved time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConfig {
    pub default_value: Option<String>,
    pub entries: Vec<TimeEntry>,
    /// Entry matching `default_value`, else the first entry
    pub current_entry: TimeEntry,
}

impl TimeConfig {
    /// Build the axis from declared values in document order.
    ///
    /// Returns `None` when no value is declared.
    pub fn from_values<I, S>(values: I, default_value: Option<String>) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<TimeEntry> = values
            .into_iter()
            .map(|v| TimeEntry::from_value(v.as_ref()))
            .collect();

        let current_entry = default_value
            .as_deref()
            .and_then(|default| entries.iter().find(|e| e.timestamp == default))
            .or_else(|| entries.first())?
            .clone();

        Some(Self {
            default_value,
            entries,
            current_entry,
        })
    }

    /// Distinct numeric years in declaration order.
    pub fn years(&self) -> Vec<i32> {
        let mut years = Vec::new();
        for entry in &self.entries {
            if let Some(TimeYear::Year(year)) = entry.year {
                if !years.contains(&year) {
                    years.push(year);
                }
            }
        }
        years
    }
}
