use std::path::PathBuf;

use anyhow::Result;
use icalkit_core::inspect::CalendarSummary;
use icalkit_core::{CalendarDocument, EventRecord, extract_events, filter_events, sort_events_by_date};
use serde::Serialize;

use super::read_calendar_file;
use crate::render;

#[derive(Serialize)]
struct ViewOutput<'a> {
    summary: &'a CalendarSummary,
    events: &'a [EventRecord],
}

pub async fn run(
    file: PathBuf,
    search: Option<String>,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let content = read_calendar_file(&file).await?;
    let doc = CalendarDocument::parse(&content)?;

    let summary = CalendarSummary::from_document(&doc);
    let sorted = sort_events_by_date(&extract_events(doc.events()));
    let matching = filter_events(&sorted, search.as_deref().unwrap_or_default());
    let shown = &matching[..limit.unwrap_or(matching.len()).min(matching.len())];

    if json {
        let output = ViewOutput {
            summary: &summary,
            events: shown,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", render::render_calendar_summary(&summary));
    println!();
    println!("{}", render::render_event_list(shown));

    if shown.len() < matching.len() {
        println!("\n... and {} more", matching.len() - shown.len());
    }

    Ok(())
}
