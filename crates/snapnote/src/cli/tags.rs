//! `tags` command handler

use snapnote_core::tags::TagIndex;

use crate::cli::CliVault;

/// Handle the 'tags' command
/// Prints one tag per line, sorted
pub fn handle_tags(vault: &CliVault) -> bool {
    match TagIndex::collect(vault) {
        Ok(index) if index.tags().is_empty() => {
            println!("No tags found in {}", vault.root().display());
            true
        }
        Ok(index) => {
            for tag in index.tags() {
                println!("{}", tag);
            }
            true
        }
        Err(e) => {
            eprintln!("✗ Error reading vault: {}", e);
            false
        }
    }
}
