//! ICS serialization.
//!
//! Component structure is written here so that property order and
//! components without a UID survive unchanged. Each content line goes
//! through `icalendar::Property`, which escapes TEXT values, quotes
//! parameters and folds at 75 octets.

use std::fmt::{self, Write};

use super::{CalendarDocument, ContentLine, EventNode, SubComponent};

pub(super) fn write_document<W: Write>(out: &mut W, doc: &CalendarDocument) -> fmt::Result {
    out.write_str("BEGIN:VCALENDAR\r\n")?;
    for prop in doc.properties() {
        write_content_line(out, prop)?;
    }
    for component in doc.components() {
        write_component(out, component)?;
    }
    for event in doc.events() {
        write_event(out, event)?;
    }
    out.write_str("END:VCALENDAR\r\n")
}

fn write_event<W: Write>(out: &mut W, event: &EventNode) -> fmt::Result {
    out.write_str("BEGIN:VEVENT\r\n")?;
    for prop in event.properties() {
        write_content_line(out, prop)?;
    }
    for component in event.components() {
        write_component(out, component)?;
    }
    out.write_str("END:VEVENT\r\n")
}

fn write_component<W: Write>(out: &mut W, component: &SubComponent) -> fmt::Result {
    write!(out, "BEGIN:{}\r\n", component.name)?;
    for prop in &component.properties {
        write_content_line(out, prop)?;
    }
    for nested in &component.components {
        write_component(out, nested)?;
    }
    write!(out, "END:{}\r\n", component.name)
}

fn write_content_line<W: Write>(out: &mut W, line: &ContentLine) -> fmt::Result {
    let folded: String = line.to_property().try_into()?;
    out.write_str(&folded)
}
