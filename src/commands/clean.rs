use std::path::PathBuf;

use anyhow::Result;

use super::{read_calendar_file, write_calendar_file};
use crate::render;

pub async fn run(file: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let content = read_calendar_file(&file).await?;
    let result = icalkit_core::clean(content)?;

    let output = output.unwrap_or(file);
    write_calendar_file(&output, &result.content).await?;

    println!("{}", render::render_clean_summary(&result, &output));

    Ok(())
}
