use std::path::PathBuf;

use anyhow::{Context, Result};
use icalkit_core::config::IcalKitConfig;

use super::{read_calendar_file, write_calendar_file};
use crate::render;
use crate::utils::tui::create_spinner;

pub async fn run(
    config: &IcalKitConfig,
    file: PathBuf,
    chunk_size: Option<usize>,
    output_dir: Option<PathBuf>,
    sort: Option<String>,
    pattern: Option<String>,
) -> Result<()> {
    // Flags override the config file
    let mut options = config.split_options();
    if let Some(size) = chunk_size {
        options.chunk_size = size;
    }
    if let Some(sort) = sort {
        options.sort_by = sort.parse()?;
    }
    if pattern.is_some() {
        options.file_name_pattern = pattern;
    }
    let output_dir = output_dir.unwrap_or_else(|| config.output_path());

    let content = read_calendar_file(&file).await?;

    let spinner = create_spinner(format!("Splitting {}", file.display()));
    let result = icalkit_core::split(&content, &options);
    spinner.finish_and_clear();
    let result = result?;

    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create directory \"{}\"", output_dir.display()))?;

    let mut paths = Vec::with_capacity(result.chunks.len());
    for chunk in &result.chunks {
        let path = output_dir.join(&chunk.file_name);
        write_calendar_file(&path, &chunk.content).await?;
        paths.push(path);
    }

    println!("{}", render::render_split_summary(&result));
    for path in &paths {
        println!("  - {}", path.display());
    }

    Ok(())
}
