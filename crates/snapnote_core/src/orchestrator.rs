//! End-to-end paste pipeline.
//!
//! ```text
//! Idle -> CheckingImage -> NoImage
//!                       -> HasImage -> DirectCreate -> Persisted
//!                                   -> GatedCreate -> Awaiting -> Cancelled
//!                                                              -> Persisted
//! ```
//!
//! The image is always written before its note. Once both exist, a
//! `![[title]]` link goes in at the cursor of a focused editing surface and
//! exactly one success notification fires. Failures after the image check are
//! caught in one place and reported as a single error notification; nothing
//! already written is rolled back.

use crate::capability::{Clipboard, ConfirmationHost, EditingSurface, GateRequest, Notifier};
use crate::config::Settings;
use crate::error::{Result, SnapnoteError};
use crate::fs::FileSystem;
use crate::gate::GateResult;
use crate::path_utils::{file_stem, is_image_path};
use crate::store::{Clock, ImageBuffer, ImageStore, NOTE_EXTENSION, NoteStore, Vault, unix_millis};
use crate::tags::TagIndex;

/// How one paste ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// There was no image to paste; nothing was written.
    NoImage,
    /// The image and note were written.
    Success {
        /// Vault path of the image
        image_path: String,
        /// Filename of the note
        note_filename: String,
    },
    /// The confirmation gate was dismissed; nothing was written.
    Cancelled,
    /// The flow failed with the given description.
    Error(String),
}

impl PasteOutcome {
    /// Whether the image and note were created.
    pub fn is_success(&self) -> bool {
        matches!(self, PasteOutcome::Success { .. })
    }
}

/// Link inserted at the cursor for a note: `![[<filename without .md>]]`.
///
/// Only the first `.md` is removed.
pub fn note_link(note_filename: &str) -> String {
    format!("![[{}]]", note_filename.replacen(NOTE_EXTENSION, "", 1))
}

/// Name and tags chosen for a paste.
#[derive(Debug, Default)]
struct Choice {
    name: Option<String>,
    tags: Vec<String>,
}

impl From<GateResult> for Choice {
    fn from(result: GateResult) -> Self {
        Self {
            name: Some(result.name).filter(|n| !n.is_empty()),
            tags: result.tags,
        }
    }
}

/// Drives pastes against one vault and one set of host capabilities.
///
/// Every call reads its own [`Settings`] snapshot; the orchestrator keeps no
/// state between pastes.
pub struct PasteOrchestrator<'a, FS> {
    vault: &'a Vault<FS>,
    clipboard: &'a dyn Clipboard,
    surface: &'a dyn EditingSurface,
    notifier: &'a dyn Notifier,
    gate_host: &'a dyn ConfirmationHost,
    clock: Clock,
}

impl<'a, FS: FileSystem> PasteOrchestrator<'a, FS> {
    /// Create an orchestrator over the given capabilities.
    pub fn new(
        vault: &'a Vault<FS>,
        clipboard: &'a dyn Clipboard,
        surface: &'a dyn EditingSurface,
        notifier: &'a dyn Notifier,
        gate_host: &'a dyn ConfirmationHost,
    ) -> Self {
        Self {
            vault,
            clipboard,
            surface,
            notifier,
            gate_host,
            clock: unix_millis,
        }
    }

    /// Replace the timestamp source used for synthesized filenames.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Paste the clipboard image as a new image file plus note.
    pub async fn paste(&self, settings: &Settings) -> PasteOutcome {
        log::debug!("Paste requested");
        if !self.clipboard.has_image() {
            log::info!("No image in clipboard");
            self.notifier.no_image();
            return PasteOutcome::NoImage;
        }

        let buffer = match self.clipboard.read_image() {
            Ok(buffer) => buffer,
            Err(e) if e.is_image_unavailable() => {
                log::info!("{}", e);
                self.notifier.no_image();
                return PasteOutcome::NoImage;
            }
            Err(e) => return self.fail(e),
        };

        let choice = if settings.show_preview_modal {
            match self.confirm(&buffer, None).await {
                Some(choice) => choice,
                None => return PasteOutcome::Cancelled,
            }
        } else {
            Choice::default()
        };

        match self.persist_clipboard_image(&buffer, settings, &choice) {
            Ok(outcome) => outcome,
            Err(e) => self.fail(e),
        }
    }

    /// Create a note for an image that is already in the vault.
    ///
    /// `path` is a vault path. The gate, when enabled, is pre-filled with the
    /// file's stem.
    pub async fn paste_existing(&self, path: &str, settings: &Settings) -> PasteOutcome {
        log::debug!("Creating note for existing file '{}'", path);
        if !is_image_path(path) {
            return self.fail(SnapnoteError::NotAnImage(path.to_string()));
        }

        let buffer = match self.vault.read_binary(path) {
            Ok(bytes) => ImageBuffer::new(bytes),
            Err(e) => return self.fail(e),
        };

        let choice = if settings.show_preview_modal {
            let default_name = file_stem(path);
            match self.confirm(&buffer, Some(default_name)).await {
                Some(mut choice) => {
                    choice.name.get_or_insert_with(|| default_name.to_string());
                    choice
                }
                None => return PasteOutcome::Cancelled,
            }
        } else {
            Choice::default()
        };

        let result = NoteStore::new(self.vault, settings)
            .with_clock(self.clock)
            .create_from_existing_file(path, choice.name.as_deref(), &choice.tags)
            .and_then(|note_filename| self.finish(path.to_string(), note_filename));
        result.unwrap_or_else(|e| self.fail(e))
    }

    /// Open a gate and wait for it. `None` means it was dismissed.
    async fn confirm(&self, buffer: &ImageBuffer, default_name: Option<&str>) -> Option<Choice> {
        let corpus = match TagIndex::collect(self.vault) {
            Ok(index) => index.into_tags(),
            Err(e) => {
                log::warn!("Tag suggestions unavailable: {}", e);
                Vec::new()
            }
        };

        let pending = self.gate_host.open(GateRequest {
            buffer,
            default_name,
            tag_corpus: &corpus,
        });
        let result = pending.await_result().await;

        if result.cancelled {
            log::info!("Paste cancelled");
            return None;
        }
        Some(result.into())
    }

    fn persist_clipboard_image(
        &self,
        buffer: &ImageBuffer,
        settings: &Settings,
        choice: &Choice,
    ) -> Result<PasteOutcome> {
        let name = choice.name.as_deref();
        let image_path = ImageStore::new(self.vault, settings)
            .with_clock(self.clock)
            .save(buffer, name)?;
        let note_filename = NoteStore::new(self.vault, settings)
            .with_clock(self.clock)
            .create(&image_path, name, &choice.tags)?;
        self.finish(image_path, note_filename)
    }

    fn finish(&self, image_path: String, note_filename: String) -> Result<PasteOutcome> {
        if self.surface.is_focused() {
            self.surface.insert_at_cursor(&note_link(&note_filename))?;
        }
        log::info!("Created note '{}' for '{}'", note_filename, image_path);
        self.notifier.success();
        Ok(PasteOutcome::Success {
            image_path,
            note_filename,
        })
    }

    fn fail(&self, error: SnapnoteError) -> PasteOutcome {
        log::error!("Paste failed ({}): {}", error.kind(), error);
        let description = error.to_string();
        self.notifier.error(&description);
        PasteOutcome::Error(description)
    }
}
