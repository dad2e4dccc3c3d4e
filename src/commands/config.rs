use anyhow::Result;
use icalkit_core::config::IcalKitConfig;
use owo_colors::OwoColorize;

/// Print where the config lives and the settings in effect.
pub fn run(config: &IcalKitConfig) -> Result<()> {
    let config_path = IcalKitConfig::config_path()?;
    let exists = if config_path.exists() { "" } else { " (not found, using defaults)" };

    println!("{}", "Paths".bold());
    println!("  Config:     {}{}", config_path.display(), exists.dimmed());
    println!("  Output:     {}", config.output_path().display());
    println!();
    println!("{}", "Effective settings".bold());
    print!("{}", config.to_toml()?);

    Ok(())
}
