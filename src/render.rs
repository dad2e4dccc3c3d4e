//! Terminal rendering for command output.

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use icalkit_core::inspect::CalendarSummary;
use icalkit_core::{
    DuplicateHandling, DuplicateInfo, DuplicateReporter, EventRecord, MergeResult, SplitResult,
};
use owo_colors::OwoColorize;

/// Prints duplicate notices to stderr.
pub struct TerminalReporter;

impl DuplicateReporter for TerminalReporter {
    fn report(&self, duplicates: &[DuplicateInfo]) {
        eprintln!(
            "{} Found {} duplicate {}",
            "Warning:".yellow().bold(),
            duplicates.len(),
            pluralize("event", duplicates.len())
        );
        for dup in duplicates {
            eprintln!("  - {}", dup.describe().yellow());
        }
    }
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

pub fn render_split_summary(result: &SplitResult) -> String {
    format!(
        "{} Split {} {} into {} {}",
        "✓".green(),
        result.total_events,
        pluralize("event", result.total_events),
        result.chunks.len(),
        pluralize("file", result.chunks.len())
    )
}

pub fn render_merge_summary(result: &MergeResult, output: &Path) -> String {
    let mut lines = vec![
        format!(
            "{} Merged {} calendars into {}",
            "✓".green(),
            result.source_count,
            output.display()
        ),
        format!("  Total events: {}", result.total_events),
    ];

    let meta = &result.metadata;
    if meta.duplicates_found > 0 {
        if meta.duplicate_handling == DuplicateHandling::Remove {
            lines.push(format!("  Duplicates removed: {}", meta.duplicates_removed));
        } else {
            lines.push(format!("  Duplicates found: {}", meta.duplicates_found));
        }
    }

    lines.join("\n")
}

pub fn render_clean_summary(result: &MergeResult, output: &Path) -> String {
    let removed = result.metadata.duplicates_removed;
    if removed == 0 {
        return format!("{} No duplicate events in {}", "✓".green(), output.display());
    }

    let mut lines = vec![format!(
        "{} Removed {} duplicate {}, kept {} in {}",
        "✓".green(),
        removed,
        pluralize("event", removed),
        result.total_events,
        output.display()
    )];
    for dup in &result.metadata.duplicate_details {
        lines.push(format!("  - {} (UID: {})", dup.summary, dup.uid).dimmed().to_string());
    }

    lines.join("\n")
}

pub fn render_calendar_summary(summary: &CalendarSummary) -> String {
    let name = summary.calendar_name.as_deref().unwrap_or("(unnamed calendar)");
    let mut lines = vec![
        format!("📅 {}", name.bold()),
        format!(
            "   {} {}, {} {}",
            summary.event_count,
            pluralize("event", summary.event_count),
            summary.todo_count,
            pluralize("todo", summary.todo_count)
        ),
    ];

    if let (Some(first), Some(last)) = (summary.first_start, summary.last_start) {
        lines.push(
            format!("   {} → {}", format_date(&first), format_date(&last))
                .dimmed()
                .to_string(),
        );
    }

    lines.join("\n")
}

/// Render events grouped by day, undated events last.
pub fn render_event_list(events: &[EventRecord]) -> String {
    if events.is_empty() {
        return "No events found".dimmed().to_string();
    }

    let mut lines = Vec::new();
    let mut current_label: Option<String> = None;

    for event in events {
        let label = event
            .start_date
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "No date".to_string());

        if current_label.as_ref() != Some(&label) {
            if current_label.is_some() {
                lines.push(String::new());
            }
            lines.push(label.bold().to_string());
            current_label = Some(label);
        }

        let time = event
            .start_date
            .as_ref()
            .map(format_time)
            .unwrap_or_else(|| format!("{:>7}", "-"));

        let mut line = format!("  {} {}", time, event.summary);
        if !event.location.is_empty() {
            line.push_str(&format!(" {}", format!("@ {}", event.location).dimmed()));
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%a %b %-d, %Y").to_string()
}

fn format_time(dt: &DateTime<Utc>) -> String {
    format!("{:>7}", dt.with_timezone(&Local).format("%H:%M").to_string())
}
