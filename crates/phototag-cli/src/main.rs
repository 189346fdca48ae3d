//! phototag CLI
//!
//! Command-line interface for phototag - albums of tagged photos.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use phototag_core::{Catalog, Config, StorageError, TagKind};

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "phototag")]
#[command(about = "phototag - organize photos into albums and find them by tag")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage albums
    Album {
        #[command(subcommand)]
        command: AlbumCommands,
    },
    /// Manage photos in albums
    Photo {
        #[command(subcommand)]
        command: PhotoCommands,
    },
    /// Manage photo tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Find photos by tag value prefix
    Search {
        /// Tag kind (person or location)
        kind: TagKind,
        /// Start of the tag value, case-insensitive
        prefix: String,
        /// Also require a second tag
        #[arg(long, num_args = 2, value_names = ["KIND", "PREFIX"], conflicts_with = "or")]
        and: Option<Vec<String>>,
        /// Accept a second tag instead
        #[arg(long, num_args = 2, value_names = ["KIND", "PREFIX"])]
        or: Option<Vec<String>>,
    },
    /// Show catalog status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AlbumCommands {
    /// List all albums
    #[command(alias = "ls")]
    List,
    /// Create a new album
    #[command(alias = "add")]
    Create {
        /// Album name
        name: String,
    },
    /// Rename an album
    Rename {
        /// Current album name
        name: String,
        /// New album name
        new_name: String,
    },
    /// Delete an album and its photos
    #[command(alias = "rm")]
    Delete {
        /// Album name
        name: String,
    },
    /// Show the photos in an album
    Show {
        /// Album name
        name: String,
    },
}

#[derive(Subcommand)]
enum PhotoCommands {
    /// Add a photo to an album
    Add {
        /// Album name
        album: String,
        /// Photo path or URI
        locator: String,
        /// Tag a person
        #[arg(short, long)]
        person: Vec<String>,
        /// Tag a location
        #[arg(short, long)]
        location: Vec<String>,
    },
    /// Remove a photo from an album
    #[command(alias = "rm")]
    Remove {
        /// Album name
        album: String,
        /// Photo path or URI
        locator: String,
    },
    /// Move a photo to another album
    #[command(alias = "mv")]
    Move {
        /// Photo path or URI
        locator: String,
        /// Album the photo is in
        from: String,
        /// Album to move it to
        to: String,
    },
    /// Show a photo and its tags
    Show {
        /// Album name
        album: String,
        /// Photo path or URI
        locator: String,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Tag a photo
    Add {
        /// Album name
        album: String,
        /// Photo path or URI
        locator: String,
        /// Tag kind (person or location)
        kind: TagKind,
        /// Tag value
        value: String,
    },
    /// Remove a tag from a photo
    #[command(alias = "rm")]
    Remove {
        /// Album name
        album: String,
        /// Photo path or URI
        locator: String,
        /// Tag kind (person or location)
        kind: TagKind,
        /// Tag value
        value: String,
    },
    /// List known values of a tag kind
    Values {
        /// Tag kind (person or location)
        kind: TagKind,
        /// Only values starting with this
        #[arg(default_value = "")]
        prefix: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, catalog_file, recovery, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e
                .downcast_ref::<StorageError>()
                .and_then(StorageError::recovery_suggestion)
            {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    // Config commands don't need the catalog
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), output);
    }

    let config =
        Config::load_with_cli_override(cli.config.as_ref()).context("Failed to load configuration")?;
    logging::init(&config);

    let mut catalog = Catalog::open_with_config(&config)?;

    let result = match cli.command {
        Commands::Album { command } => handle_album_command(command, &mut catalog, output),
        Commands::Photo { command } => handle_photo_command(command, &mut catalog, output),
        Commands::Tag { command } => handle_tag_command(command, &mut catalog, output),
        Commands::Search {
            kind,
            prefix,
            and,
            or,
        } => commands::search::run(&catalog, kind, prefix, and, or, output),
        Commands::Status => commands::status::show(&catalog, &config, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    // A failed command may still have left unsaved changes behind
    catalog
        .close()
        .map_err(|(_, e)| e)
        .context("Failed to save catalog")?;

    result
}

fn handle_album_command(command: AlbumCommands, catalog: &mut Catalog, output: &Output) -> Result<()> {
    match command {
        AlbumCommands::List => commands::album::list(catalog, output),
        AlbumCommands::Create { name } => commands::album::create(catalog, name, output),
        AlbumCommands::Rename { name, new_name } => {
            commands::album::rename(catalog, name, new_name, output)
        }
        AlbumCommands::Delete { name } => commands::album::delete(catalog, name, output),
        AlbumCommands::Show { name } => commands::album::show(catalog, name, output),
    }
}

fn handle_photo_command(command: PhotoCommands, catalog: &mut Catalog, output: &Output) -> Result<()> {
    match command {
        PhotoCommands::Add {
            album,
            locator,
            person,
            location,
        } => commands::photo::add(catalog, album, locator, person, location, output),
        PhotoCommands::Remove { album, locator } => {
            commands::photo::remove(catalog, album, locator, output)
        }
        PhotoCommands::Move { locator, from, to } => {
            commands::photo::move_to(catalog, locator, from, to, output)
        }
        PhotoCommands::Show { album, locator } => {
            commands::photo::show(catalog, album, locator, output)
        }
    }
}

fn handle_tag_command(command: TagCommands, catalog: &mut Catalog, output: &Output) -> Result<()> {
    match command {
        TagCommands::Add {
            album,
            locator,
            kind,
            value,
        } => commands::tag::add(catalog, album, locator, kind, value, output),
        TagCommands::Remove {
            album,
            locator,
            kind,
            value,
        } => commands::tag::remove(catalog, album, locator, kind, value, output),
        TagCommands::Values { kind, prefix } => commands::tag::values(catalog, kind, prefix, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_with_second_tag() {
        let cli = Cli::try_parse_from([
            "phototag", "search", "person", "jo", "--or", "location", "par",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                kind, prefix, or, and, ..
            } => {
                assert_eq!(kind, TagKind::Person);
                assert_eq!(prefix, "jo");
                assert_eq!(or, Some(vec!["location".to_string(), "par".to_string()]));
                assert!(and.is_none());
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_and_conflicts_with_or() {
        let result = Cli::try_parse_from([
            "phototag", "search", "person", "jo", "--and", "location", "p", "--or", "person",
            "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["phototag", "tag", "values", "camera"]);
        assert!(result.is_err());
    }
}
