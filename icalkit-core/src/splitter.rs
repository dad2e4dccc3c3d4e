//! Split a calendar into fixed-size chunks.
//!
//! Every chunk is a standalone calendar that keeps the original
//! calendar-level properties (VERSION, PRODID, X-WR-CALNAME, ...) and the
//! original non-event components such as VTIMEZONE.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IcalKitError, IcalKitResult};
use crate::events::cmp_start;
use crate::ics::{CalendarDocument, EventNode};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_FILE_NAME_PATTERN: &str = "calendar_part_{n}_of_{total}.ics";

/// Event ordering applied before splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Ascending DTSTART, events without one last
    #[default]
    Dtstart,
    /// Keep the order of the source file
    Original,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Dtstart => "dtstart",
            SortOrder::Original => "original",
        }
    }
}

impl FromStr for SortOrder {
    type Err = IcalKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dtstart" => Ok(SortOrder::Dtstart),
            "original" => Ok(SortOrder::Original),
            other => Err(IcalKitError::InvalidOption(format!(
                "Invalid sort order: \"{}\". Valid options: dtstart, original",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Events per chunk, must be at least 1
    pub chunk_size: usize,
    pub sort_by: SortOrder,
    /// File name with `{n}` and `{total}` placeholders
    pub file_name_pattern: Option<String>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sort_by: SortOrder::default(),
            file_name_pattern: None,
        }
    }
}

impl SplitOptions {
    fn validate(&self) -> IcalKitResult<()> {
        if self.chunk_size == 0 {
            return Err(IcalKitError::InvalidOption(
                "Chunk size must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    fn file_name(&self, n: usize, total: usize) -> String {
        self.file_name_pattern
            .as_deref()
            .unwrap_or(DEFAULT_FILE_NAME_PATTERN)
            .replace("{n}", &n.to_string())
            .replace("{total}", &total.to_string())
    }
}

/// Half-open `[start, end)` offsets into the sequence that was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventRange {
    pub start: usize,
    pub end: usize,
}

/// One standalone calendar produced by a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IcsChunk {
    pub file_name: String,
    pub content: String,
    pub event_count: usize,
    pub event_range: EventRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitMetadata {
    pub split_at: DateTime<Utc>,
    pub chunk_size: usize,
    pub sort_by: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    pub chunks: Vec<IcsChunk>,
    /// Number of events in the source calendar
    pub total_events: usize,
    pub metadata: SplitMetadata,
}

/// Order events for splitting. Sorting is stable so ties keep source order.
fn order_events(events: &[Arc<EventNode>], sort_by: SortOrder) -> Vec<Arc<EventNode>> {
    match sort_by {
        SortOrder::Original => events.to_vec(),
        SortOrder::Dtstart => {
            let mut keyed: Vec<_> = events
                .iter()
                .map(|event| (event.start_instant(), Arc::clone(event)))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| cmp_start(a.as_ref(), b.as_ref()));
            keyed.into_iter().map(|(_, event)| event).collect()
        }
    }
}

/// Split an already parsed document into chunks.
pub fn split_into_chunks(
    document: &CalendarDocument,
    options: &SplitOptions,
) -> IcalKitResult<Vec<IcsChunk>> {
    options.validate()?;

    let events = order_events(document.events(), options.sort_by);
    let total = events.len().div_ceil(options.chunk_size);

    let chunks: Vec<IcsChunk> = events
        .chunks(options.chunk_size)
        .enumerate()
        .map(|(i, group)| {
            let start = i * options.chunk_size;
            let chunk_doc = CalendarDocument::with_events(
                document.properties().to_vec(),
                document.components().to_vec(),
                group.to_vec(),
            );

            IcsChunk {
                file_name: options.file_name(i + 1, total),
                content: chunk_doc.serialize(),
                event_count: group.len(),
                event_range: EventRange {
                    start,
                    end: start + group.len(),
                },
            }
        })
        .collect();

    debug!(
        events = events.len(),
        chunks = chunks.len(),
        chunk_size = options.chunk_size,
        sort_by = %options.sort_by,
        "Split calendar"
    );

    Ok(chunks)
}

/// Parse ICS text and split it into chunks.
pub fn split(content: &str, options: &SplitOptions) -> IcalKitResult<SplitResult> {
    options.validate()?;

    let document = CalendarDocument::parse(content)?;
    let chunks = split_into_chunks(&document, options)?;

    Ok(SplitResult {
        chunks,
        total_events: document.total_events(),
        metadata: SplitMetadata {
            split_at: Utc::now(),
            chunk_size: options.chunk_size,
            sort_by: options.sort_by,
        },
    })
}
