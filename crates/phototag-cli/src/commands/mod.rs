//! Command handlers

pub mod album;
pub mod config;
pub mod photo;
pub mod search;
pub mod status;
pub mod tag;

use anyhow::{bail, Result};

/// Trim user-supplied text and refuse it if nothing is left
pub(crate) fn non_empty(label: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{} cannot be empty", label);
    }
    Ok(trimmed.to_string())
}
