pub mod clean;
pub mod config;
pub mod merge;
pub mod split;
pub mod view;

use std::path::Path;

use anyhow::{Context, Result};

/// Read an .ics file as UTF-8 text.
pub async fn read_calendar_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file \"{}\"", path.display()))
}

pub async fn write_calendar_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file \"{}\"", path.display()))
}
