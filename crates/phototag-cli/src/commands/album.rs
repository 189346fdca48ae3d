//! Album command handlers

use anyhow::{bail, Result};
use tracing::debug;

use phototag_core::{Album, Catalog};

use super::non_empty;
use crate::output::Output;

/// List all albums
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    output.print_albums(catalog.albums());
    Ok(())
}

/// Create a new, empty album
pub fn create(catalog: &mut Catalog, name: String, output: &Output) -> Result<()> {
    let name = non_empty("Album name", name)?;

    if !catalog.add_album(Album::new(name.as_str()))? {
        bail!("Album '{}' already exists", name);
    }

    debug!(album = %name, "Created album");
    output.success(&format!("Created album '{}'", name));
    Ok(())
}

/// Rename an album, keeping its photos
pub fn rename(catalog: &mut Catalog, name: String, new_name: String, output: &Output) -> Result<()> {
    let new_name = non_empty("Album name", new_name)?;

    if !catalog.contains_album(&name) {
        bail!("Album not found: {}", name);
    }
    if !catalog.rename_album(&name, &new_name)? {
        bail!("Album '{}' already exists", new_name);
    }

    output.success(&format!("Renamed album '{}' to '{}'", name, new_name));
    Ok(())
}

/// Delete an album together with its photos
pub fn delete(catalog: &mut Catalog, name: String, output: &Output) -> Result<()> {
    if !catalog.remove_album(&name)? {
        bail!("Album not found: {}", name);
    }

    output.success(&format!("Deleted album '{}'", name));
    Ok(())
}

/// Show one album and its photos
pub fn show(catalog: &Catalog, name: String, output: &Output) -> Result<()> {
    match catalog.album(&name) {
        Some(album) => {
            output.print_album(album);
            Ok(())
        }
        None => bail!("Album not found: {}", name),
    }
}
