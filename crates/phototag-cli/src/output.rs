//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;
use serde_json::json;

use phototag_core::{Album, Photo, SearchHit, TagKind};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the album list with photo counts
    pub fn print_albums(&self, albums: &[Album]) {
        match self.format {
            OutputFormat::Human => {
                if albums.is_empty() {
                    println!("No albums found.");
                    return;
                }
                for album in albums {
                    println!("{} ({})", truncate(album.name(), 50), album.photo_count());
                }
                println!("\n{} album(s)", albums.len());
            }
            OutputFormat::Json => {
                let json_albums: Vec<_> = albums
                    .iter()
                    .map(|a| json!({"name": a.name(), "photos": a.photo_count()}))
                    .collect();
                print_json(&json_albums);
            }
            OutputFormat::Quiet => {
                for album in albums {
                    println!("{}", album.name());
                }
            }
        }
    }

    /// Print one album with its photos
    pub fn print_album(&self, album: &Album) {
        match self.format {
            OutputFormat::Human => {
                println!("Album: {}", album.name());
                println!();
                if album.is_empty() {
                    println!("No photos in this album.");
                    return;
                }
                for photo in album.photos() {
                    println!("{}", photo_line(photo));
                }
                println!("\n{} photo(s)", album.photo_count());
            }
            OutputFormat::Json => print_json(album),
            OutputFormat::Quiet => {
                for photo in album.photos() {
                    println!("{}", photo.locator());
                }
            }
        }
    }

    /// Print a single photo and its tags
    pub fn print_photo(&self, album: &Album, photo: &Photo) {
        match self.format {
            OutputFormat::Human => {
                println!("Name:     {}", photo.display_name(None));
                println!("Locator:  {}", photo.locator());
                println!("Album:    {}", album.name());
                for kind in TagKind::ALL {
                    let values = photo.tag_values(kind);
                    if !values.is_empty() {
                        println!("{:<9} {}", format!("{}:", label(kind)), values.join(", "));
                    }
                }
            }
            OutputFormat::Json => print_json(&json!({
                "album": album.name(),
                "name": photo.display_name(None),
                "locator": photo.locator(),
                "tags": photo.tags(),
            })),
            OutputFormat::Quiet => println!("{}", photo.locator()),
        }
    }

    /// Print search results
    pub fn print_hits(&self, hits: &[SearchHit<'_>]) {
        match self.format {
            OutputFormat::Human => {
                if hits.is_empty() {
                    println!("No photos found.");
                    return;
                }
                for hit in hits {
                    println!(
                        "{} | {}",
                        truncate(hit.album.name(), 20),
                        photo_line(hit.photo)
                    );
                }
                println!("\n{} photo(s)", hits.len());
            }
            OutputFormat::Json => {
                let json_hits: Vec<_> = hits
                    .iter()
                    .map(|hit| {
                        json!({
                            "album": hit.album.name(),
                            "name": hit.photo.display_name(None),
                            "locator": hit.photo.locator(),
                            "tags": hit.photo.tags(),
                        })
                    })
                    .collect();
                print_json(&json_hits);
            }
            OutputFormat::Quiet => {
                for hit in hits {
                    println!("{}", hit.photo.locator());
                }
            }
        }
    }

    /// Print known tag values of one kind
    pub fn print_tag_values(&self, kind: TagKind, values: &[&str]) {
        match self.format {
            OutputFormat::Human => {
                if values.is_empty() {
                    println!("No {} tags found.", kind);
                    return;
                }
                for value in values {
                    println!("{}", value);
                }
                println!("\n{} value(s)", values.len());
            }
            OutputFormat::Json => print_json(&json!({"kind": kind, "values": values})),
            OutputFormat::Quiet => {
                for value in values {
                    println!("{}", value);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!("{}", json!({"status": "success", "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to format output: {}", e),
    }
}

/// One line summary of a photo: name, locator and tags
fn photo_line(photo: &Photo) -> String {
    let tags: Vec<String> = photo.tags().iter().map(ToString::to_string).collect();
    let mut line = format!(
        "{} | {}",
        truncate(&photo.display_name(None), 25),
        truncate(photo.locator(), 45)
    );
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    line
}

fn label(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Person => "People",
        TagKind::Location => "Places",
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phototag_core::Tag;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("Zürich Hauptbahnhof", 9), "Zürich...");
    }

    #[test]
    fn test_photo_line() {
        let mut photo = Photo::new("/pics/beach.jpg");
        assert_eq!(photo_line(&photo), "beach | /pics/beach.jpg");

        photo.add_tag(Tag::person("Jon"));
        photo.add_tag(Tag::location("Paris"));
        assert_eq!(
            photo_line(&photo),
            "beach | /pics/beach.jpg [person: Jon, location: Paris]"
        );
    }
}
