//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::json;

use phototag_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "data_dir": config.data_dir,
                    "catalog_file": config.catalog_path(),
                    "recovery": config.recovery.to_string(),
                    "log_file": config.log_path()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.catalog_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:     {}", config.data_dir.display());
            println!(
                "  catalog_file: {}{}",
                config.catalog_path().display(),
                if config.catalog_file.is_none() { " (default)" } else { "" }
            );
            println!("  recovery:     {}", config.recovery);
            println!(
                "  log_file:     {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let unset = value.is_empty() || value == "none";

    match key {
        "data_dir" => {
            if unset {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "catalog_file" => {
            config.catalog_file = if unset { None } else { Some(value.into()) };
        }
        "recovery" => {
            config.recovery = value.parse()?;
        }
        "log_file" => {
            config.log_file = if unset { None } else { Some(value.into()) };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, catalog_file, recovery, log_file",
                key
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phototag_core::RecoveryPolicy;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "recovery", "Strict").unwrap();
        assert_eq!(config.recovery, RecoveryPolicy::Strict);

        apply(&mut config, "catalog_file", "/tmp/photos.json").unwrap();
        assert_eq!(config.catalog_path(), PathBuf::from("/tmp/photos.json"));

        apply(&mut config, "catalog_file", "none").unwrap();
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();

        assert!(apply(&mut config, "sync_url", "x").is_err());
        assert!(apply(&mut config, "recovery", "sometimes").is_err());
        assert!(apply(&mut config, "data_dir", "").is_err());
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\n", temp_dir.path().join("data")),
        )
        .unwrap();
        let output = Output::new(OutputFormat::Quiet);

        set("recovery".into(), "strict".into(), Some(&path), &output).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("recovery = \"strict\""));
    }
}
