//! Wire formats for instants and calendar dates, and the day window used by
//! availability queries.
//!
//! Instants travel as RFC 3339 strings with an explicit offset and are
//! normalised to UTC. Dates travel as `YYYY-MM-DD`. A date is resolved to a
//! `[midnight, next midnight)` window in the deployment's reference timezone.

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{AgendaError, AgendaResult};
use crate::models::TimeWindow;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_instant(field: &'static str, raw: &str) -> AgendaResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|source| AgendaError::InvalidFormat { field, source })
}

pub fn parse_date(raw: &str) -> AgendaResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|source| AgendaError::InvalidFormat { field: "date", source })
}

pub fn parse_timezone(name: &str) -> AgendaResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AgendaError::UnknownTimezone(name.to_string()))
}

/// Renders an instant the way responses carry it, e.g. `2025-03-10T10:00:00Z`.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Returns the calendar day `date` in `tz` as a UTC window.
pub fn day_window(date: NaiveDate, tz: Tz) -> AgendaResult<TimeWindow> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AgendaError::InvalidRange {
            start: date.to_string(),
            end: "next day".to_string(),
        })?;

    Ok(TimeWindow {
        start: start_of_day(date, tz),
        end: start_of_day(next, tz),
    })
}

// Midnight can fall into a DST gap in a few zones; the day then starts at the
// first instant that exists.
fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut local = date.and_time(NaiveTime::MIN);
    loop {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(instant) => return instant.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => local += chrono::Duration::minutes(15),
        }
    }
}
