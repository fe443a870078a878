//! Key binding handling for the confirmation screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use snapnote_core::gate::{ConfirmationGate, Field};

/// Handle a key event.
///
/// Tab switches fields, Up/Down move through suggestions, Enter applies a
/// suggestion or confirms, Esc (or Ctrl-C) dismisses. Backspace on an empty
/// tag field removes the last tag.
pub fn handle_key(gate: &mut ConfirmationGate<'_>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => gate.dismiss(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => gate.dismiss(),

        KeyCode::Tab | KeyCode::BackTab => gate.toggle_focus(),

        KeyCode::Down if gate.focus() == Field::Tags => gate.navigate_down(),
        KeyCode::Up if gate.focus() == Field::Tags => gate.navigate_up(),

        KeyCode::Enter => gate.press_enter(),

        KeyCode::Backspace => match gate.focus() {
            Field::Name => {
                let mut name = gate.name_value().to_string();
                name.pop();
                gate.set_name(&name);
            }
            Field::Tags if gate.tag_query().is_empty() => {
                if let Some(last) = gate.selected_tags().last().cloned() {
                    gate.remove_tag(&last);
                }
            }
            Field::Tags => {
                let mut query = gate.tag_query().to_string();
                query.pop();
                gate.set_tag_query(&query);
            }
        },

        KeyCode::Char(c) => match gate.focus() {
            Field::Name => {
                let name = format!("{}{}", gate.name_value(), c);
                gate.set_name(&name);
            }
            Field::Tags => {
                let query = format!("{}{}", gate.tag_query(), c);
                gate.set_tag_query(&query);
            }
        },

        _ => {}
    }
}
