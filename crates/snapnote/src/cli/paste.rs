//! `paste` and `from-file` command handlers

use std::path::Path;

use snapnote_core::config::Config;
use snapnote_core::orchestrator::{PasteOrchestrator, PasteOutcome};

use crate::cli::args::PasteOptions;
use crate::cli::clipboard::ArboardClipboard;
use crate::cli::gate::TerminalGate;
use crate::cli::notify::ConsoleNotifier;
use crate::cli::surface::MarkdownFileSurface;
use crate::cli::{CliVault, block_on};

/// Handle the 'paste' command
/// Returns true when a note was created or the user cancelled
pub fn handle_paste(vault: &CliVault, config: &Config, options: &PasteOptions) -> bool {
    let settings = options.apply(&config.settings());
    let surface = MarkdownFileSurface::new(options.insert_into.clone(), options.line);

    let orchestrator = PasteOrchestrator::new(
        vault,
        &ArboardClipboard,
        &surface,
        &ConsoleNotifier,
        &TerminalGate,
    );
    report(block_on(orchestrator.paste(&settings)))
}

/// Handle the 'from-file' command
/// Returns true when a note was created or the user cancelled
pub fn handle_from_file(
    vault: &CliVault,
    config: &Config,
    options: &PasteOptions,
    path: &str,
) -> bool {
    let Some(vault_path) = resolve_vault_file(vault, path) else {
        eprintln!("✗ File not found in vault: {}", path);
        return false;
    };

    let settings = options.apply(&config.settings());
    let surface = MarkdownFileSurface::new(options.insert_into.clone(), options.line);

    let orchestrator = PasteOrchestrator::new(
        vault,
        &ArboardClipboard,
        &surface,
        &ConsoleNotifier,
        &TerminalGate,
    );
    report(block_on(orchestrator.paste_existing(&vault_path, &settings)))
}

/// Print details for an outcome; the notifier has already reported it.
fn report(outcome: PasteOutcome) -> bool {
    match outcome {
        PasteOutcome::Success {
            image_path,
            note_filename,
        } => {
            println!("  Image: {}", image_path);
            println!("  Note:  {}", note_filename);
            true
        }
        PasteOutcome::Cancelled => {
            println!("Paste cancelled.");
            true
        }
        PasteOutcome::NoImage | PasteOutcome::Error(_) => false,
    }
}

/// Vault path of `path`.
///
/// Accepts a filesystem path (absolute, or relative to the current
/// directory) that lies inside the vault, or a vault-relative path.
fn resolve_vault_file(vault: &CliVault, path: &str) -> Option<String> {
    let on_disk = Path::new(path);
    if on_disk.is_file()
        && let Ok(absolute) = on_disk.canonicalize()
        && let Ok(root) = vault.root().canonicalize()
        && let Ok(relative) = absolute.strip_prefix(&root)
    {
        return vault.vault_path(&vault.root().join(relative));
    }

    let vault_path = path.trim_start_matches("./").trim_start_matches('/');
    vault.path_exists(vault_path).then(|| vault_path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapnote_core::fs::RealFileSystem;
    use snapnote_core::store::Vault;

    #[test]
    fn test_resolve_vault_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("media")).unwrap();
        std::fs::write(dir.path().join("media/a.png"), [1]).unwrap();
        let vault = Vault::new(RealFileSystem, dir.path());

        assert_eq!(
            resolve_vault_file(&vault, "media/a.png").as_deref(),
            Some("media/a.png")
        );
        assert_eq!(resolve_vault_file(&vault, "media/missing.png"), None);
    }

    #[test]
    fn test_resolve_absolute_path_inside_vault() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("media")).unwrap();
        let file = dir.path().join("media/b.png");
        std::fs::write(&file, [1]).unwrap();
        let vault = Vault::new(RealFileSystem, dir.path());

        assert_eq!(
            resolve_vault_file(&vault, file.to_str().unwrap()).as_deref(),
            Some("media/b.png")
        );
    }

    #[test]
    fn test_report_exit_status() {
        assert!(report(PasteOutcome::Cancelled));
        assert!(!report(PasteOutcome::NoImage));
        assert!(!report(PasteOutcome::Error("boom".to_string())));
    }
}
