//! Command-line argument structures and enums

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use snapnote_core::config::Settings;

#[derive(Parser)]
#[command(name = "snapnote")]
#[command(version)]
#[command(about = "Paste clipboard images into a markdown vault as notes", long_about = None)]
pub struct Cli {
    /// Override vault location
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the clipboard image and create a note embedding it
    #[command(alias = "p")]
    Paste {
        #[command(flatten)]
        options: PasteOptions,
    },

    /// Create a note for an image that is already in the vault
    FromFile {
        /// Image path (vault-relative, or a filesystem path inside the vault)
        path: String,

        #[command(flatten)]
        options: PasteOptions,
    },

    /// List tags used in the vault
    Tags,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Per-invocation overrides shared by `paste` and `from-file`.
#[derive(Args, Debug, Clone, Default)]
pub struct PasteOptions {
    /// Ask for a name and tags before writing anything
    #[arg(long, conflicts_with = "no_confirm")]
    pub confirm: bool,

    /// Write immediately with generated names
    #[arg(long)]
    pub no_confirm: bool,

    /// Folder for the image (vault-relative)
    #[arg(long, value_name = "FOLDER")]
    pub image_folder: Option<String>,

    /// Folder for the note (vault-relative)
    #[arg(long, value_name = "FOLDER")]
    pub note_folder: Option<String>,

    /// Template note to build the note from
    #[arg(long, value_name = "NOTE")]
    pub template: Option<String>,

    /// Record the image in an `asset` property
    #[arg(long)]
    pub asset: bool,

    /// Insert a link to the new note into this markdown file
    #[arg(long, value_name = "FILE")]
    pub insert_into: Option<PathBuf>,

    /// Line (1-based) to insert the link before; defaults to the end
    #[arg(long, requires = "insert_into")]
    pub line: Option<usize>,
}

impl PasteOptions {
    /// Settings for this invocation: `base` with the flags applied.
    pub fn apply(&self, base: &Settings) -> Settings {
        let mut settings = base.clone();
        if self.confirm {
            settings.show_preview_modal = true;
        }
        if self.no_confirm {
            settings.show_preview_modal = false;
        }
        if let Some(folder) = &self.image_folder {
            settings.image_folder = folder.clone();
        }
        if let Some(folder) = &self.note_folder {
            settings.image_notes_folder = folder.clone();
        }
        if let Some(template) = &self.template {
            settings.template_file = template.clone();
        }
        if self.asset {
            settings.include_asset_property = true;
        }
        settings.normalized()
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key (vault, image_folder, image_notes_folder, show_preview_modal,
        /// include_asset_property, template_file)
        key: String,

        /// New value
        value: String,
    },

    /// Write a fresh config file
    Init {
        /// Vault directory (default: ~/snapnote)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}
