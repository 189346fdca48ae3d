//! Photo command handlers

use anyhow::{bail, Result};

use phototag_core::{Catalog, Photo, Tag};

use super::non_empty;
use crate::output::Output;

/// Add a photo, with optional tags, to an album
pub fn add(
    catalog: &mut Catalog,
    album: String,
    locator: String,
    people: Vec<String>,
    locations: Vec<String>,
    output: &Output,
) -> Result<()> {
    let locator = non_empty("Photo locator", locator)?;

    let mut photo = Photo::new(locator.as_str());
    for person in people {
        photo.add_tag(Tag::person(non_empty("Tag value", person)?));
    }
    for location in locations {
        photo.add_tag(Tag::location(non_empty("Tag value", location)?));
    }
    let tag_count = photo.tags().len();

    let Some(existing) = catalog.album(&album) else {
        bail!("Album not found: {}", album);
    };
    if existing.contains_photo(&locator) {
        bail!("Album '{}' already contains {}", existing.name(), locator);
    }

    catalog.add_photo(&album, photo)?;

    match tag_count {
        0 => output.success(&format!("Added {} to '{}'", locator, album)),
        n => output.success(&format!("Added {} to '{}' with {} tag(s)", locator, album, n)),
    }
    Ok(())
}

/// Remove a photo and its tags from an album
pub fn remove(catalog: &mut Catalog, album: String, locator: String, output: &Output) -> Result<()> {
    if !catalog.contains_album(&album) {
        bail!("Album not found: {}", album);
    }
    if !catalog.remove_photo(&album, &locator)? {
        bail!("Photo not found in '{}': {}", album, locator);
    }

    output.success(&format!("Removed {} from '{}'", locator, album));
    Ok(())
}

/// Move a photo between albums, keeping its tags
pub fn move_to(
    catalog: &mut Catalog,
    locator: String,
    from: String,
    to: String,
    output: &Output,
) -> Result<()> {
    for name in [&from, &to] {
        if !catalog.contains_album(name) {
            bail!("Album not found: {}", name);
        }
    }
    if catalog.photo(&from, &locator).is_none() {
        bail!("Photo not found in '{}': {}", from, locator);
    }
    if !catalog.move_photo(&locator, &from, &to)? {
        bail!("Album '{}' already contains {}", to, locator);
    }

    output.success(&format!("Moved {} from '{}' to '{}'", locator, from, to));
    Ok(())
}

/// Show a photo and its tags
pub fn show(catalog: &Catalog, album: String, locator: String, output: &Output) -> Result<()> {
    let Some(owner) = catalog.album(&album) else {
        bail!("Album not found: {}", album);
    };
    let Some(photo) = owner.photo_by_locator(&locator) else {
        bail!("Photo not found in '{}': {}", album, locator);
    };

    output.print_photo(owner, photo);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use phototag_core::{Album, TagKind};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn catalog_with(albums: &[&str]) -> Catalog {
        let mut catalog = Catalog::in_memory();
        for name in albums {
            catalog.add_album(Album::new(*name)).unwrap();
        }
        catalog
    }

    #[test]
    fn test_add_with_tags() {
        let mut catalog = catalog_with(&["Trip"]);

        add(
            &mut catalog,
            "trip".to_string(),
            "/pics/img1.jpg".to_string(),
            vec!["Jon".to_string(), "jon".to_string()],
            vec!["Paris".to_string()],
            &quiet(),
        )
        .unwrap();

        let photo = catalog.photo("Trip", "/pics/img1.jpg").unwrap();
        assert_eq!(photo.tag_values(TagKind::Person), vec!["Jon"]);
        assert_eq!(photo.tag_values(TagKind::Location), vec!["Paris"]);
    }

    #[test]
    fn test_add_rejections() {
        let mut catalog = catalog_with(&["Trip"]);
        let add_plain = |catalog: &mut Catalog, album: &str, locator: &str| {
            add(catalog, album.to_string(), locator.to_string(), vec![], vec![], &quiet())
        };

        add_plain(&mut catalog, "Trip", "a.jpg").unwrap();
        assert!(add_plain(&mut catalog, "Trip", "a.jpg").is_err());
        assert!(add_plain(&mut catalog, "Missing", "b.jpg").is_err());
        assert!(add_plain(&mut catalog, "Trip", " ").is_err());

        let err = add(
            &mut catalog,
            "Trip".to_string(),
            "c.jpg".to_string(),
            vec!["".to_string()],
            vec![],
            &quiet(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Tag value cannot be empty");
        assert_eq!(catalog.album("Trip").unwrap().photo_count(), 1);
    }

    #[test]
    fn test_move_and_remove() {
        let mut catalog = catalog_with(&["A", "B"]);
        add(
            &mut catalog,
            "A".to_string(),
            "p.jpg".to_string(),
            vec!["Ann".to_string()],
            vec![],
            &quiet(),
        )
        .unwrap();

        assert!(move_to(&mut catalog, "p.jpg".into(), "B".into(), "A".into(), &quiet()).is_err());
        assert!(move_to(&mut catalog, "p.jpg".into(), "A".into(), "C".into(), &quiet()).is_err());

        move_to(&mut catalog, "p.jpg".into(), "A".into(), "B".into(), &quiet()).unwrap();
        assert!(catalog.photo("A", "p.jpg").is_none());
        assert!(catalog.photo("B", "p.jpg").unwrap().has_tag(TagKind::Person, "ann"));

        show(&catalog, "B".into(), "p.jpg".into(), &quiet()).unwrap();
        assert!(show(&catalog, "A".into(), "p.jpg".into(), &quiet()).is_err());

        remove(&mut catalog, "B".into(), "p.jpg".into(), &quiet()).unwrap();
        assert!(remove(&mut catalog, "B".into(), "p.jpg".into(), &quiet()).is_err());
    }
}
