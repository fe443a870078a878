//! Confirmation gate in the terminal
//!
//! A full-screen ratatui form: image summary, name field, tag chips, tag
//! field with suggestions. The gate's state and rules live in
//! `snapnote_core::gate`; this module only draws it and feeds it keys.

mod app;
mod keys;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::DefaultTerminal;
use snapnote_core::capability::{ConfirmationHost, GateRequest};
use snapnote_core::gate::{ConfirmationGate, GateLifecycle, PendingConfirmation};

/// Shows confirmation gates as a full-screen terminal form.
///
/// `open` runs the form to completion, so the returned pending result is
/// already decided.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalGate;

impl ConfirmationHost for TerminalGate {
    fn open(&self, request: GateRequest<'_>) -> PendingConfirmation {
        let terminal: TerminalSlot = Rc::new(RefCell::new(None));
        let session = TerminalSession {
            terminal: Rc::clone(&terminal),
        };
        let (mut gate, pending) = ConfirmationGate::open_with_lifecycle(request, Box::new(session));

        if let Err(e) = app::run(&terminal, &mut gate) {
            log::error!("Confirmation screen failed: {}", e);
            eprintln!("✗ Confirmation screen failed: {}", e);
        }

        // No-op if the user already decided
        gate.dismiss();
        pending
    }
}

/// Terminal shared between the session hooks and the event loop.
type TerminalSlot = Rc<RefCell<Option<DefaultTerminal>>>;

/// Enters the alternate screen when the gate opens and restores the terminal
/// when it closes.
struct TerminalSession {
    terminal: TerminalSlot,
}

impl GateLifecycle for TerminalSession {
    fn on_open(&mut self, preview: &[u8]) {
        log::debug!("Opening confirmation screen for {} bytes", preview.len());
        match ratatui::try_init() {
            Ok(terminal) => *self.terminal.borrow_mut() = Some(terminal),
            Err(e) => log::error!("Could not initialize terminal: {}", e),
        }
    }

    fn on_close(&mut self) {
        // Restore terminal (always, even on error)
        if self.terminal.borrow_mut().take().is_some() {
            ratatui::restore();
        }
    }
}
