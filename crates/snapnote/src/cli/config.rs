//! Config command handlers

use snapnote_core::config::Config;
use std::path::PathBuf;

use crate::cli::args::ConfigCommands;

/// Handle the 'config' command
/// Returns true on success, false on error
pub fn handle_config_command(
    command: Option<ConfigCommands>,
    vault_override: Option<PathBuf>,
    config: Config,
) -> bool {
    match command {
        None | Some(ConfigCommands::Show) => {
            show_config(&config);
            true
        }
        Some(ConfigCommands::Set { key, value }) => set_config_value(config, &key, &value),
        Some(ConfigCommands::Init { dir }) => init_config(dir.or(vault_override)),
    }
}

/// Print the effective configuration
fn show_config(config: &Config) {
    let settings = config.settings();
    println!("Snapnote Configuration");
    println!("======================");
    println!("Vault: {}", config.default_vault.display());
    println!("Image folder: {}", display_folder(&settings.image_folder));
    println!("Note folder: {}", display_folder(&settings.image_notes_folder));
    println!("Confirm before pasting: {}", settings.show_preview_modal);
    println!("Asset property: {}", settings.include_asset_property);
    if settings.template_file.is_empty() {
        println!("Template: (none)");
    } else {
        println!("Template: {}", settings.template_file);
    }
    match Config::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created yet)", path.display()),
        None => {}
    }
}

fn display_folder(folder: &str) -> &str {
    if folder.is_empty() { "(vault root)" } else { folder }
}

/// Set one value and save
fn set_config_value(mut config: Config, key: &str, value: &str) -> bool {
    if let Err(e) = config.set(key, value) {
        eprintln!("✗ {}", e);
        return false;
    }
    match config.save() {
        Ok(()) => {
            println!("✓ Set {} = {}", key, value);
            true
        }
        Err(e) => {
            eprintln!("✗ Failed to save config: {}", e);
            false
        }
    }
}

/// Write a fresh config pointing at `dir` (default ~/snapnote)
fn init_config(dir: Option<PathBuf>) -> bool {
    let dir = dir.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snapnote")
    });

    match Config::init(dir.clone()) {
        Ok(_) => {
            println!("✓ Initialized snapnote configuration");
            println!("  Vault: {}", dir.display());
            if let Some(config_path) = Config::config_path() {
                println!("  Config: {}", config_path.display());
            }
            true
        }
        Err(e) => {
            eprintln!("✗ Error initializing config: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_folder() {
        assert_eq!(display_folder(""), "(vault root)");
        assert_eq!(display_folder("media"), "media");
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        assert!(!set_config_value(Config::new(PathBuf::from("/v")), "colour", "blue"));
    }
}
