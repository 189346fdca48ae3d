//! Tag command handlers

use anyhow::{bail, Result};

use phototag_core::{Catalog, Tag, TagKind};

use super::non_empty;
use crate::output::Output;

/// Tag a photo
pub fn add(
    catalog: &mut Catalog,
    album: String,
    locator: String,
    kind: TagKind,
    value: String,
    output: &Output,
) -> Result<()> {
    let tag = Tag::new(kind, non_empty("Tag value", value)?);
    let Some(photo) = catalog.photo(&album, &locator) else {
        bail!("Photo not found in '{}': {}", album, locator);
    };
    if photo.tags().contains(&tag) {
        bail!("{} already has tag '{}'", locator, tag);
    }

    catalog.add_tag(&album, &locator, tag.clone())?;

    output.success(&format!("Tagged {} with '{}'", locator, tag));
    Ok(())
}

/// Remove a tag from a photo
pub fn remove(
    catalog: &mut Catalog,
    album: String,
    locator: String,
    kind: TagKind,
    value: String,
    output: &Output,
) -> Result<()> {
    let tag = Tag::new(kind, value.trim());
    if catalog.photo(&album, &locator).is_none() {
        bail!("Photo not found in '{}': {}", album, locator);
    }
    if !catalog.remove_tag(&album, &locator, &tag)? {
        bail!("{} has no tag '{}'", locator, tag);
    }

    output.success(&format!("Removed tag '{}' from {}", tag, locator));
    Ok(())
}

/// List the known values of a tag kind, optionally narrowed by prefix
pub fn values(catalog: &Catalog, kind: TagKind, prefix: String, output: &Output) -> Result<()> {
    let values = catalog.tag_values_with_prefix(kind, &prefix);
    output.print_tag_values(kind, &values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use phototag_core::{Album, Photo};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn catalog_with_photo() -> Catalog {
        let mut catalog = Catalog::in_memory();
        catalog.add_album(Album::new("Trip")).unwrap();
        catalog.add_photo("Trip", Photo::new("a.jpg")).unwrap();
        catalog
    }

    #[test]
    fn test_add_and_remove_tag() {
        let mut catalog = catalog_with_photo();

        add(&mut catalog, "Trip".into(), "a.jpg".into(), TagKind::Person, " Jon ".into(), &quiet())
            .unwrap();
        assert!(catalog.photo("Trip", "a.jpg").unwrap().has_tag(TagKind::Person, "Jon"));

        let err = add(&mut catalog, "Trip".into(), "a.jpg".into(), TagKind::Person, "JON".into(), &quiet())
            .unwrap_err();
        assert!(err.to_string().contains("already has tag"));

        remove(&mut catalog, "Trip".into(), "a.jpg".into(), TagKind::Person, "jon".into(), &quiet())
            .unwrap();
        assert!(catalog.photo("Trip", "a.jpg").unwrap().tags().is_empty());

        let err = remove(&mut catalog, "Trip".into(), "a.jpg".into(), TagKind::Person, "jon".into(), &quiet())
            .unwrap_err();
        assert!(err.to_string().contains("has no tag"));
    }

    #[test]
    fn test_tag_missing_photo() {
        let mut catalog = catalog_with_photo();

        assert!(add(&mut catalog, "Trip".into(), "b.jpg".into(), TagKind::Location, "Rome".into(), &quiet()).is_err());
        assert!(add(&mut catalog, "Home".into(), "a.jpg".into(), TagKind::Location, "Rome".into(), &quiet()).is_err());
        assert!(add(&mut catalog, "Trip".into(), "a.jpg".into(), TagKind::Location, "".into(), &quiet()).is_err());
        values(&catalog, TagKind::Location, String::new(), &quiet()).unwrap();
    }
}
