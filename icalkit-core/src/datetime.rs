//! Interpretation of DTSTART/DTEND values.
//!
//! Handles:
//! - VALUE=DATE: `DTSTART;VALUE=DATE:20240108` (midnight UTC)
//! - UTC: `DTSTART:20240108T100000Z`
//! - TZID parameter: `DTSTART;TZID=America/New_York:20240108T100000`
//! - Floating: `DTSTART:20240108T100000` (read as UTC)
//!
//! Unknown TZIDs fall back to floating interpretation.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{CalendarDateTime, DatePerhapsTime, Property};

use crate::ics::ContentLine;

/// Convert a date-valued content line to a UTC instant.
pub fn parse_date_value(prop: &ContentLine) -> Option<DateTime<Utc>> {
    match DatePerhapsTime::from_property(&date_property(prop)?)? {
        DatePerhapsTime::Date(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => Some(naive.and_utc()),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            Some(in_zone(&date_time, &tzid).unwrap_or_else(|| date_time.and_utc()))
        }
    }
}

/// Rebuild the line with only the parameters that shape a date value.
///
/// Multi-valued properties only contribute their first value. A `Z` suffix
/// wins over a stray TZID.
fn date_property(prop: &ContentLine) -> Option<Property> {
    let value = prop.value.split(',').next()?.trim();
    if value.is_empty() {
        return None;
    }

    let mut date = Property::new(prop.name.to_ascii_uppercase(), value);
    if let Some(kind) = prop.param("VALUE") {
        date.add_parameter("VALUE", &kind.to_ascii_uppercase());
    }
    if let Some(tzid) = prop.param("TZID").filter(|_| !value.ends_with('Z')) {
        date.add_parameter("TZID", tzid);
    }
    Some(date)
}

/// Local time in a named zone. None for unknown zones and DST gaps.
fn in_zone(local: &NaiveDateTime, tzid: &str) -> Option<DateTime<Utc>> {
    let tz: Tz = tzid.trim_matches('"').trim_start_matches('/').parse().ok()?;
    tz.from_local_datetime(local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
