//! Notifications printed to the console

use snapnote_core::capability::Notifier;

/// Prints paste notifications with `✓`/`✗` prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self) {
        println!("✓ Created note with pasted image");
    }

    fn no_image(&self) {
        eprintln!("✗ No image found in clipboard");
    }

    fn error(&self, description: &str) {
        eprintln!("✗ Failed to paste image: {}", description);
    }
}
