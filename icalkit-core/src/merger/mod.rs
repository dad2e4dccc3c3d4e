//! Merge several calendars into one.
//!
//! Duplicates are detected by UID in a single pass over the sources (in
//! input order) and their events (in file order). The first source in which
//! a UID appears holds the original; every later occurrence is a duplicate.
//! Events without a UID never take part in duplicate detection.

mod reporter;

pub use reporter::{DuplicateReporter, SilentReporter, TracingReporter};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IcalKitError, IcalKitResult};
use crate::events::UNTITLED;
use crate::ics::{CALENDAR_NAME_PROPERTY, CalendarDocument, ContentLine, SubComponent};

/// What to do with events whose UID was already seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateHandling {
    /// Keep every event, report duplicates silently in the metadata
    KeepAll,
    /// Keep only the first occurrence of each UID
    Remove,
    /// Keep every event and send duplicates to the reporter
    #[default]
    Warn,
}

impl DuplicateHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateHandling::KeepAll => "keep-all",
            DuplicateHandling::Remove => "remove",
            DuplicateHandling::Warn => "warn",
        }
    }
}

impl FromStr for DuplicateHandling {
    type Err = IcalKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep-all" => Ok(DuplicateHandling::KeepAll),
            "remove" => Ok(DuplicateHandling::Remove),
            "warn" => Ok(DuplicateHandling::Warn),
            other => Err(IcalKitError::InvalidOption(format!(
                "Invalid duplicates option: \"{}\". Valid options: keep-all, remove, warn",
                other
            ))),
        }
    }
}

impl fmt::Display for DuplicateHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub duplicates: DuplicateHandling,
    /// Overrides X-WR-CALNAME of the first calendar
    pub calendar_name: Option<String>,
}

/// A merge source: raw ICS text or an already parsed document.
#[derive(Debug, Clone)]
pub enum MergeInput {
    Text(String),
    Parsed(CalendarDocument),
}

impl MergeInput {
    fn into_document(self) -> IcalKitResult<CalendarDocument> {
        match self {
            MergeInput::Text(text) => CalendarDocument::parse(&text),
            MergeInput::Parsed(doc) => Ok(doc),
        }
    }
}

impl From<&str> for MergeInput {
    fn from(text: &str) -> Self {
        MergeInput::Text(text.to_string())
    }
}

impl From<String> for MergeInput {
    fn from(text: String) -> Self {
        MergeInput::Text(text)
    }
}

impl From<CalendarDocument> for MergeInput {
    fn from(doc: CalendarDocument) -> Self {
        MergeInput::Parsed(doc)
    }
}

/// One event whose UID was already present in an earlier position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateInfo {
    pub uid: String,
    pub summary: String,
    /// 0-based source where the duplicate was found
    pub source_index: usize,
    /// 0-based source where the UID first appeared
    pub original_index: usize,
}

impl DuplicateInfo {
    /// Human-readable one-line description (calendar numbers are 1-based).
    pub fn describe(&self) -> String {
        format!(
            "\"{}\" (UID: {}) appears in calendars {} and {}",
            self.summary,
            self.uid,
            self.original_index + 1,
            self.source_index + 1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeMetadata {
    pub merged_at: DateTime<Utc>,
    pub duplicate_handling: DuplicateHandling,
    /// Duplicates found, whatever the policy
    pub duplicates_found: usize,
    /// Non-zero only with [`DuplicateHandling::Remove`]
    pub duplicates_removed: usize,
    pub duplicate_details: Vec<DuplicateInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub content: String,
    pub total_events: usize,
    pub source_count: usize,
    pub metadata: MergeMetadata,
}

/// Merge calendars into a single document.
///
/// Calendar-level properties come from the first input. Events keep
/// source-then-file order; merging never re-sorts.
pub fn merge<I>(
    inputs: I,
    options: &MergeOptions,
    reporter: &dyn DuplicateReporter,
) -> IcalKitResult<MergeResult>
where
    I: IntoIterator,
    I::Item: Into<MergeInput>,
{
    let documents = inputs
        .into_iter()
        .map(|input| input.into().into_document())
        .collect::<IcalKitResult<Vec<_>>>()?;

    let Some(first) = documents.first() else {
        return Err(IcalKitError::InvalidInput(
            "At least one calendar input is required".to_string(),
        ));
    };

    // uid -> index of the source holding the original
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicate_details = Vec::new();
    let mut merged_events = Vec::new();
    let mut duplicates_removed = 0;

    for (source_index, doc) in documents.iter().enumerate() {
        for event in doc.events() {
            let Some(uid) = event.uid() else {
                merged_events.push(Arc::clone(event));
                continue;
            };

            if let Some(&original_index) = seen.get(uid) {
                duplicate_details.push(DuplicateInfo {
                    uid: uid.to_string(),
                    summary: event.summary().unwrap_or_else(|| UNTITLED.to_string()),
                    source_index,
                    original_index,
                });

                if options.duplicates == DuplicateHandling::Remove {
                    duplicates_removed += 1;
                    continue;
                }
            } else {
                seen.insert(uid, source_index);
            }

            merged_events.push(Arc::clone(event));
        }
    }

    if options.duplicates == DuplicateHandling::Warn && !duplicate_details.is_empty() {
        reporter.report(&duplicate_details);
    }

    let properties = merged_properties(first.properties(), options.calendar_name.as_deref());
    let components = merged_components(&documents);
    let total_events = merged_events.len();
    let merged = CalendarDocument::with_events(properties, components, merged_events);

    debug!(
        sources = documents.len(),
        total_events,
        duplicates_found = duplicate_details.len(),
        duplicates_removed,
        policy = %options.duplicates,
        "Merged calendars"
    );

    Ok(MergeResult {
        content: merged.serialize(),
        total_events,
        source_count: documents.len(),
        metadata: MergeMetadata {
            merged_at: Utc::now(),
            duplicate_handling: options.duplicates,
            duplicates_found: duplicate_details.len(),
            duplicates_removed,
            duplicate_details,
        },
    })
}

/// Remove repeated UIDs from a single calendar.
pub fn clean(input: impl Into<MergeInput>) -> IcalKitResult<MergeResult> {
    let options = MergeOptions {
        duplicates: DuplicateHandling::Remove,
        calendar_name: None,
    };
    merge([input.into()], &options, &SilentReporter)
}

/// Copy properties, replacing the calendar name when an override is given.
fn merged_properties(properties: &[ContentLine], calendar_name: Option<&str>) -> Vec<ContentLine> {
    let Some(name) = calendar_name else {
        return properties.to_vec();
    };

    let name_line = ContentLine::new(CALENDAR_NAME_PROPERTY, name);
    let mut replaced = false;
    let mut out = Vec::with_capacity(properties.len() + 1);

    for prop in properties {
        if prop.is(CALENDAR_NAME_PROPERTY) {
            if !replaced {
                out.push(name_line.clone());
                replaced = true;
            }
        } else {
            out.push(prop.clone());
        }
    }

    if !replaced {
        out.push(name_line);
    }

    out
}

/// Components of the first calendar, plus timezone definitions from later
/// calendars so their TZID references still resolve.
fn merged_components(documents: &[CalendarDocument]) -> Vec<Arc<SubComponent>> {
    let mut components: Vec<Arc<SubComponent>> = Vec::new();
    let mut tzids: HashSet<String> = HashSet::new();

    for (index, doc) in documents.iter().enumerate() {
        for component in doc.components() {
            if component.is("VTIMEZONE") {
                let tzid = component
                    .find_prop("TZID")
                    .map(|p| p.value.clone())
                    .unwrap_or_default();
                if !tzids.insert(tzid) {
                    continue;
                }
            } else if index > 0 {
                continue;
            }
            components.push(Arc::clone(component));
        }
    }

    components
}
