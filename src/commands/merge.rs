use std::path::PathBuf;

use anyhow::Result;
use icalkit_core::config::IcalKitConfig;

use super::{read_calendar_file, write_calendar_file};
use crate::render::{self, TerminalReporter};
use crate::utils::tui::create_spinner;

pub async fn run(
    config: &IcalKitConfig,
    files: Vec<PathBuf>,
    output: PathBuf,
    duplicates: Option<String>,
    name: Option<String>,
) -> Result<()> {
    if files.len() < 2 {
        anyhow::bail!("At least two input files are required for merging");
    }

    let mut options = config.merge_options(name);
    if let Some(duplicates) = duplicates {
        options.duplicates = duplicates.parse()?;
    }

    let spinner = create_spinner(format!("Reading {} calendars", files.len()));
    let mut contents = Vec::with_capacity(files.len());
    for file in &files {
        spinner.set_message(format!("Reading {}", file.display()));
        contents.push(read_calendar_file(file).await?);
    }
    spinner.finish_and_clear();

    let result = icalkit_core::merge(contents, &options, &TerminalReporter)?;

    write_calendar_file(&output, &result.content).await?;

    println!("{}", render::render_merge_summary(&result, &output));

    Ok(())
}
