//! Calendar overview used by `icalkit view`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ics::CalendarDocument;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSummary {
    pub calendar_name: Option<String>,
    pub event_count: usize,
    pub todo_count: usize,
    /// Earliest DTSTART among events
    pub first_start: Option<DateTime<Utc>>,
    /// Latest DTSTART among events
    pub last_start: Option<DateTime<Utc>>,
}

impl CalendarSummary {
    pub fn from_document(doc: &CalendarDocument) -> Self {
        let starts: Vec<DateTime<Utc>> = doc
            .events()
            .iter()
            .filter_map(|e| e.start_instant())
            .collect();

        CalendarSummary {
            calendar_name: doc.calendar_name(),
            event_count: doc.total_events(),
            todo_count: doc.components().iter().filter(|c| c.is("VTODO")).count(),
            first_start: starts.iter().min().copied(),
            last_start: starts.iter().max().copied(),
        }
    }
}
