//! Core library for icalkit.
//!
//! This crate holds everything the CLI does to calendars, without any I/O:
//! - `ics` parses and writes .ics documents
//! - `splitter` cuts a calendar into standalone chunks
//! - `merger` combines calendars and resolves duplicate UIDs
//! - `events` projects events into flat records for search and display

pub mod config;
pub mod datetime;
pub mod error;
pub mod events;
pub mod ics;
pub mod inspect;
pub mod merger;
pub mod splitter;

pub use error::{IcalKitError, IcalKitResult};
pub use events::{EventRecord, extract_events, filter_events, sort_events_by_date};
pub use ics::CalendarDocument;
pub use merger::{
    DuplicateHandling, DuplicateInfo, DuplicateReporter, MergeInput, MergeOptions, MergeResult,
    clean, merge,
};
pub use splitter::{IcsChunk, SortOrder, SplitOptions, SplitResult, split, split_into_chunks};
