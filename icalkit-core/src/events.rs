//! Event projection: flat records for search, sort and display.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ics::EventNode;

/// Placeholder used when an event has no SUMMARY.
pub const UNTITLED: &str = "(no title)";

/// A flattened view of one VEVENT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Position in the extracted sequence (not persisted)
    pub id: usize,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl EventRecord {
    fn from_node(id: usize, node: &EventNode) -> Self {
        EventRecord {
            id,
            summary: node.summary().unwrap_or_else(|| UNTITLED.to_string()),
            description: node.description().unwrap_or_default(),
            location: node.location().unwrap_or_default(),
            start_date: node.start_instant(),
            end_date: node.end_instant(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.summary, &self.description, &self.location]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Extract one record per event, ids assigned in input order.
pub fn extract_events(events: &[Arc<EventNode>]) -> Vec<EventRecord> {
    events
        .iter()
        .enumerate()
        .map(|(id, node)| EventRecord::from_node(id, node))
        .collect()
}

/// Ascending order where a missing start sorts after any present start.
pub(crate) fn cmp_start(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort records by start date into a new vector. The input is left untouched.
///
/// The sort is stable, so records sharing a start (or lacking one) keep
/// their relative order.
pub fn sort_events_by_date(events: &[EventRecord]) -> Vec<EventRecord> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| cmp_start(a.start_date.as_ref(), b.start_date.as_ref()));
    sorted
}

/// Case-insensitive substring search over summary, description and location.
///
/// A blank query returns the input as-is.
pub fn filter_events<'a>(events: &'a [EventRecord], query: &str) -> Cow<'a, [EventRecord]> {
    if query.trim().is_empty() {
        return Cow::Borrowed(events);
    }

    let needle = query.to_lowercase();
    Cow::Owned(
        events
            .iter()
            .filter(|event| event.matches(&needle))
            .cloned()
            .collect(),
    )
}
