//! Display names for photos
//!
//! A photo only stores its locator. The name shown to a user is derived from
//! the locator's last path segment, or supplied by a [`NameResolver`] that
//! knows more about the resource (a media store, a file manager). Resolvers
//! are best-effort: a `None` or empty answer falls back to the derivation.

/// Name shown when nothing can be derived from the locator
pub const PLACEHOLDER_NAME: &str = "Photo";

/// Resolves a locator to a display name registered elsewhere
pub trait NameResolver {
    fn display_name_for(&self, locator: &str) -> Option<String>;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn display_name_for(&self, locator: &str) -> Option<String> {
        self(locator)
    }
}

/// Display name for `locator`, extension removed
pub fn display_name(locator: &str, resolver: Option<&dyn NameResolver>) -> String {
    let resolved = resolver
        .and_then(|r| r.display_name_for(locator))
        .filter(|name| !name.is_empty());
    if let Some(name) = resolved {
        return strip_extension(&name).to_string();
    }

    match last_segment(locator) {
        Some(segment) => strip_extension(segment).to_string(),
        None => PLACEHOLDER_NAME.to_string(),
    }
}

/// Drop a trailing `.ext`; a leading dot (hidden file) is not an extension
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Last non-empty path segment of a URI or filesystem path
fn last_segment(locator: &str) -> Option<&str> {
    let end = locator.find(['?', '#']).unwrap_or(locator.len());
    let mut path = &locator[..end];

    // scheme://authority/path -> /path
    if let Some(idx) = path.find("://") {
        let rest = &path[idx + 3..];
        path = rest.find('/').map_or("", |slash| &rest[slash..]);
    }

    let segment = path.rsplit(['/', '\\']).find(|s| !s.is_empty())?;

    // Content URIs often carry a whole encoded path in one segment
    let segment = match segment.to_ascii_uppercase().rfind("%2F") {
        Some(idx) => &segment[idx + 3..],
        None => segment,
    };

    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        assert_eq!(display_name("/sdcard/DCIM/img1.jpg", None), "img1");
        assert_eq!(display_name("img1.jpg", None), "img1");
        assert_eq!(display_name(r"C:\Users\me\Pictures\beach.png", None), "beach");
    }

    #[test]
    fn test_file_uri() {
        assert_eq!(display_name("file:///home/me/pics/cat.jpeg", None), "cat");
        assert_eq!(
            display_name("file:///home/me/pics/cat.jpeg?size=large#top", None),
            "cat"
        );
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        assert_eq!(display_name("archive.tar.gz", None), "archive.tar");
        assert_eq!(display_name("/pics/.hidden", None), ".hidden");
        assert_eq!(display_name("/pics/noext", None), "noext");
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        assert_eq!(display_name("/pics/holiday/", None), "holiday");
    }

    #[test]
    fn test_encoded_path_segment() {
        let locator = "content://com.android.externalstorage.documents/document/primary%3ADCIM%2FCamera%2Fsunset.jpg";
        assert_eq!(display_name(locator, None), "sunset");
    }

    #[test]
    fn test_placeholder_when_nothing_to_derive() {
        assert_eq!(display_name("content://media", None), PLACEHOLDER_NAME);
        assert_eq!(display_name("", None), PLACEHOLDER_NAME);
        assert_eq!(display_name("/", None), PLACEHOLDER_NAME);
    }

    #[test]
    fn test_resolver_overrides_derivation() {
        let resolver = |locator: &str| {
            locator
                .starts_with("content://")
                .then(|| "Birthday Party.heic".to_string())
        };
        assert_eq!(
            display_name("content://media/external/images/media/42", Some(&resolver)),
            "Birthday Party"
        );
        assert_eq!(display_name("/pics/cake.jpg", Some(&resolver)), "cake");
    }

    #[test]
    fn test_empty_resolver_answer_falls_back() {
        let resolver = |_: &str| Some(String::new());
        assert_eq!(display_name("/pics/cake.jpg", Some(&resolver)), "cake");
    }
}
