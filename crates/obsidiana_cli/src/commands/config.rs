use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;

use obsidiana_core::config::{self, ObsidianaConfig};

use crate::output::Output;

/// Show current configuration
pub async fn show(config: &ObsidianaConfig) -> Result<()> {
    let output = Output::new();

    output.section("Current Configuration");
    println!();

    let toml_str = toml::to_string_pretty(config).into_diagnostic()?;
    println!("{}", toml_str);

    output.kv("store file", &config.store.resolved_path().display().to_string());
    Ok(())
}

/// Save current configuration to file
pub async fn save(config: &ObsidianaConfig, path: &PathBuf) -> Result<()> {
    let output = Output::new();

    output.info("💾", &format!("Saving configuration to: {}", path.display()));

    config::save_config(config, path).await?;

    output.success("Configuration saved successfully!");
    println!();
    println!("To use this configuration, run:");
    println!("  {} --config {}", "obsidiana".bright_green(), path.display());
    Ok(())
}
