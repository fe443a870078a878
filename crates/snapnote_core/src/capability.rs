//! Host capabilities the paste pipeline calls into.
//!
//! The core never talks to a clipboard, an editor or a notification area
//! directly. Hosts implement these traits (the CLI binds them to arboard, a
//! markdown file and the terminal; tests bind them to recording fakes).

use crate::error::Result;
use crate::gate::PendingConfirmation;
use crate::store::ImageBuffer;

/// Access to the system clipboard.
pub trait Clipboard {
    /// Whether the clipboard currently offers image data.
    fn has_image(&self) -> bool;

    /// Read the clipboard image as PNG bytes.
    ///
    /// Fails with [`SnapnoteError::ImageUnavailable`](crate::error::SnapnoteError::ImageUnavailable)
    /// when there is no image.
    fn read_image(&self) -> Result<ImageBuffer>;
}

/// A text editing surface with a cursor (the note being edited).
pub trait EditingSurface {
    /// Whether a surface is focused and accepts insertions.
    fn is_focused(&self) -> bool;

    /// Insert `text` at the cursor.
    ///
    /// Fails with [`SnapnoteError::NoActiveSurface`](crate::error::SnapnoteError::NoActiveSurface)
    /// when nothing is focused.
    fn insert_at_cursor(&self, text: &str) -> Result<()>;
}

/// User-visible notifications.
pub trait Notifier {
    /// The image and its note were created.
    fn success(&self);

    /// There was no image to paste.
    fn no_image(&self);

    /// The paste failed.
    fn error(&self, description: &str);
}

/// What a host needs to show a confirmation gate.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    /// Image being pasted, for the preview.
    pub buffer: &'a ImageBuffer,
    /// Name pre-filled in the name field; `None` means a synthesized
    /// `pasted-image-<ms>` name.
    pub default_name: Option<&'a str>,
    /// Known tags offered as suggestions.
    pub tag_corpus: &'a [String],
}

/// Opens confirmation gates.
///
/// Implementations present the gate however they like (terminal UI, dialog,
/// scripted answers) and hand back the pending result; the orchestrator
/// awaits it.
pub trait ConfirmationHost {
    /// Open a gate for one paste.
    fn open(&self, request: GateRequest<'_>) -> PendingConfirmation;
}

/// Host without any editor; insertion always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl EditingSurface for NoSurface {
    fn is_focused(&self) -> bool {
        false
    }

    fn insert_at_cursor(&self, _text: &str) -> Result<()> {
        Err(crate::error::SnapnoteError::NoActiveSurface)
    }
}
