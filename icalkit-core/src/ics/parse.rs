//! ICS parsing using the icalendar crate's parser.

use std::sync::Arc;

use icalendar::parser::{Component, Property, read_calendar, unfold};
use tracing::debug;

use super::{CalendarDocument, ContentLine, EventNode, Parameter, SubComponent};
use crate::error::{IcalKitError, IcalKitResult};

pub(super) fn parse_document(content: &str) -> IcalKitResult<CalendarDocument> {
    check_wrapper(content)?;

    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| IcalKitError::Parse(e.to_string()))?;

    let properties: Vec<ContentLine> = calendar.properties.iter().map(to_content_line).collect();

    let mut components = Vec::new();
    let mut events = Vec::new();

    for component in &calendar.components {
        if component.name.as_ref().eq_ignore_ascii_case("VEVENT") {
            let sub = to_sub_component(component);
            events.push(Arc::new(EventNode::new(sub.properties, sub.components)));
        } else {
            components.push(Arc::new(to_sub_component(component)));
        }
    }

    debug!(
        properties = properties.len(),
        events = events.len(),
        other_components = components.len(),
        "Parsed calendar document"
    );

    Ok(CalendarDocument::with_events(properties, components, events))
}

/// The parser is lenient about the outer wrapper, so check it up front.
fn check_wrapper(content: &str) -> IcalKitResult<()> {
    let mut lines = content
        .lines()
        .map(|l| l.trim_start_matches('\u{feff}').trim())
        .filter(|l| !l.is_empty());

    let first = lines
        .next()
        .ok_or_else(|| IcalKitError::Parse("Input is empty".to_string()))?;
    if !first.eq_ignore_ascii_case("BEGIN:VCALENDAR") {
        return Err(IcalKitError::Parse(format!(
            "Expected BEGIN:VCALENDAR, found '{}'",
            first
        )));
    }

    let last = lines.last().unwrap_or(first);
    if !last.eq_ignore_ascii_case("END:VCALENDAR") {
        return Err(IcalKitError::Parse(
            "Missing END:VCALENDAR".to_string(),
        ));
    }

    Ok(())
}

fn to_sub_component(component: &Component<'_>) -> SubComponent {
    SubComponent {
        name: component.name.as_ref().to_ascii_uppercase(),
        properties: component.properties.iter().map(to_content_line).collect(),
        components: component.components.iter().map(to_sub_component).collect(),
    }
}

fn to_content_line(prop: &Property<'_>) -> ContentLine {
    ContentLine {
        name: prop.name.to_string(),
        params: prop
            .params
            .iter()
            .map(|p| Parameter {
                name: p.key.to_string(),
                value: p.val.as_ref().map(|v| v.to_string()),
            })
            .collect(),
        value: prop.val.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_CALENDAR: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Test//Calendar1//EN
X-WR-CALNAME:Work Calendar
BEGIN:VEVENT
UID:event1@example.com
DTSTART:20240101T100000Z
DTEND:20240101T110000Z
SUMMARY:Meeting 1
LOCATION:Room 4\, North wing
BEGIN:VALARM
ACTION:DISPLAY
TRIGGER:-PT15M
DESCRIPTION:Reminder
END:VALARM
END:VEVENT
BEGIN:VTODO
UID:todo1@example.com
SUMMARY:Not an event
END:VTODO
BEGIN:VEVENT
SUMMARY:No identifier
END:VEVENT
END:VCALENDAR"#;

    #[test]
    fn test_parse_separates_properties_events_and_components() {
        let doc = CalendarDocument::parse(WORK_CALENDAR).expect("Should parse");

        let names: Vec<&str> = doc.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["VERSION", "PRODID", "X-WR-CALNAME"]);
        assert_eq!(doc.total_events(), 2, "VTODO must not count as an event");
        assert_eq!(doc.components().len(), 1);
        assert!(doc.components()[0].is("VTODO"));
        assert_eq!(doc.calendar_name().as_deref(), Some("Work Calendar"));
    }

    #[test]
    fn test_parse_keeps_nested_alarm_and_decodes_text() {
        let doc = CalendarDocument::parse(WORK_CALENDAR).expect("Should parse");
        let event = &doc.events()[0];

        assert_eq!(event.uid(), Some("event1@example.com"));
        assert_eq!(event.components().len(), 1);
        assert!(event.components()[0].is("VALARM"));
        assert_eq!(event.location().as_deref(), Some("Room 4, North wing"));
    }

    #[test]
    fn test_event_without_uid_is_valid() {
        let doc = CalendarDocument::parse(WORK_CALENDAR).expect("Should parse");
        let event = &doc.events()[1];

        assert_eq!(event.uid(), None);
        assert_eq!(event.summary().as_deref(), Some("No identifier"));
    }

    #[test]
    fn test_parse_unfolds_continuation_lines() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:folded\r\n\
DESCRIPTION:Hello \r\n world and \r\n more text\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let doc = CalendarDocument::parse(ics).expect("Should parse");
        assert_eq!(
            doc.events()[0].description().as_deref(),
            Some("Hello world and more text")
        );
    }

    #[test]
    fn test_parse_rejects_missing_wrapper() {
        let err = CalendarDocument::parse("BEGIN:VEVENT\nUID:x\nEND:VEVENT").unwrap_err();
        assert!(matches!(err, IcalKitError::Parse(_)), "Got {:?}", err);
    }

    #[test]
    fn test_parse_rejects_unterminated_calendar() {
        let err = CalendarDocument::parse("BEGIN:VCALENDAR\nVERSION:2.0\n").unwrap_err();
        assert!(matches!(err, IcalKitError::Parse(_)), "Got {:?}", err);
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        let err = CalendarDocument::parse("   \n").unwrap_err();
        assert_eq!(err, IcalKitError::Parse("Input is empty".to_string()));
    }

    #[test]
    fn test_parse_empty_calendar_has_no_events() {
        let doc = CalendarDocument::parse("BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR\n")
            .expect("Should parse");
        assert_eq!(doc.total_events(), 0);
        assert_eq!(doc.properties().len(), 1);
    }
}
