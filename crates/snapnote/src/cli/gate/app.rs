//! Main event loop for the confirmation screen

use std::cell::RefCell;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use snapnote_core::gate::ConfirmationGate;

use super::keys::handle_key;
use super::ui::render;

/// Run the confirmation event loop until the gate closes
pub fn run(
    terminal: &RefCell<Option<DefaultTerminal>>,
    gate: &mut ConfirmationGate<'_>,
) -> io::Result<()> {
    while gate.is_open() {
        // Draw UI
        {
            let mut slot = terminal.borrow_mut();
            let Some(terminal) = slot.as_mut() else {
                return Err(io::Error::other("terminal is not available"));
            };
            let view: &ConfirmationGate<'_> = gate;
            terminal.draw(|frame| render(frame, view))?;
        }

        // Handle events (with timeout for responsiveness)
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key(gate, key);
        }
    }

    Ok(())
}
