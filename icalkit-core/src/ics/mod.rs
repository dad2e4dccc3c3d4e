//! In-memory calendar document model.
//!
//! A [`CalendarDocument`] keeps the calendar-level properties, the VEVENT
//! components and any other top-level components (VTIMEZONE, VTODO, ...) in
//! the order they were read. Content lines hold decoded values (TEXT escapes
//! resolved by the parser); escaping happens again when a line is written.
//!
//! Documents are immutable once built. Events are held behind [`Arc`] so
//! the splitter and merger can assemble many output documents from one input
//! without copying event data.

mod generate;
mod parse;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use icalendar::Property;

use crate::datetime::parse_date_value;
use crate::error::{IcalKitError, IcalKitResult};

/// Property carrying the human-readable calendar name.
pub const CALENDAR_NAME_PROPERTY: &str = "X-WR-CALNAME";

/// A `KEY=VALUE` parameter on a content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: Option<String>,
}

/// One `NAME;PARAM=VALUE:value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub name: String,
    pub params: Vec<Parameter>,
    /// Decoded value, `\,` already read as `,`
    pub value: String,
}

impl ContentLine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        ContentLine {
            name: name.into(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// Builder-style helper to attach a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }

    /// Case-insensitive name comparison (ICS names are case-insensitive).
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .and_then(|p| p.value.as_deref())
    }

    /// Writer-side form of this line.
    ///
    /// `icalendar` picks the value type from `VALUE` or the property name and
    /// escapes TEXT values the same way its parser unescaped them.
    pub(crate) fn to_property(&self) -> Property {
        let mut prop = Property::new(&self.name, &self.value);
        for param in &self.params {
            prop.add_parameter(&param.name, param.value.as_deref().unwrap_or_default());
        }
        prop
    }
}

/// A nested component kept verbatim (VALARM, VTIMEZONE, STANDARD, VTODO...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubComponent {
    pub name: String,
    pub properties: Vec<ContentLine>,
    pub components: Vec<SubComponent>,
}

impl SubComponent {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn find_prop(&self, name: &str) -> Option<&ContentLine> {
        self.properties.iter().find(|p| p.is(name))
    }
}

/// A single VEVENT in its original structured form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    properties: Vec<ContentLine>,
    components: Vec<SubComponent>,
}

impl EventNode {
    pub fn new(properties: Vec<ContentLine>, components: Vec<SubComponent>) -> Self {
        EventNode {
            properties,
            components,
        }
    }

    pub fn properties(&self) -> &[ContentLine] {
        &self.properties
    }

    /// Nested components such as VALARM.
    pub fn components(&self) -> &[SubComponent] {
        &self.components
    }

    pub fn find_prop(&self, name: &str) -> Option<&ContentLine> {
        self.properties.iter().find(|p| p.is(name))
    }

    /// UID of the event. Blank UIDs are treated as missing.
    pub fn uid(&self) -> Option<&str> {
        self.find_prop("UID")
            .map(|p| p.value.trim())
            .filter(|uid| !uid.is_empty())
    }

    pub fn summary(&self) -> Option<String> {
        self.text_prop("SUMMARY")
    }

    pub fn description(&self) -> Option<String> {
        self.text_prop("DESCRIPTION")
    }

    pub fn location(&self) -> Option<String> {
        self.text_prop("LOCATION")
    }

    /// Raw DTSTART line.
    pub fn start(&self) -> Option<&ContentLine> {
        self.find_prop("DTSTART")
    }

    /// Raw DTEND line.
    pub fn end(&self) -> Option<&ContentLine> {
        self.find_prop("DTEND")
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start().and_then(parse_date_value)
    }

    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.end().and_then(parse_date_value)
    }

    fn text_prop(&self, name: &str) -> Option<String> {
        self.find_prop(name)
            .map(|p| p.value.clone())
            .filter(|text| !text.is_empty())
    }
}

/// A parsed VCALENDAR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDocument {
    properties: Vec<ContentLine>,
    components: Vec<Arc<SubComponent>>,
    events: Vec<Arc<EventNode>>,
}

impl CalendarDocument {
    /// Parse raw ICS text.
    pub fn parse(content: &str) -> IcalKitResult<Self> {
        parse::parse_document(content)
    }

    /// Assemble a new document from existing parts.
    pub fn with_events(
        properties: Vec<ContentLine>,
        components: Vec<Arc<SubComponent>>,
        events: Vec<Arc<EventNode>>,
    ) -> Self {
        CalendarDocument {
            properties,
            components,
            events,
        }
    }

    /// Calendar-level properties (VERSION, PRODID, X-WR-CALNAME, ...).
    pub fn properties(&self) -> &[ContentLine] {
        &self.properties
    }

    /// Top-level components other than VEVENT.
    pub fn components(&self) -> &[Arc<SubComponent>] {
        &self.components
    }

    pub fn events(&self) -> &[Arc<EventNode>] {
        &self.events
    }

    pub fn total_events(&self) -> usize {
        self.events.len()
    }

    pub fn calendar_name(&self) -> Option<String> {
        self.properties
            .iter()
            .find(|p| p.is(CALENDAR_NAME_PROPERTY))
            .map(|p| p.value.clone())
    }

    /// Serialize to ICS text with CRLF line endings and folded lines.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl FromStr for CalendarDocument {
    type Err = IcalKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDocument::parse(s)
    }
}

impl fmt::Display for CalendarDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        generate::write_document(f, self)
    }
}
