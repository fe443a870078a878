//! Interactive confirmation before anything is written.
//!
//! A [`ConfirmationGate`] holds the editable state of one confirmation step:
//! the name field, the selected tags and the type-ahead suggestion list. It
//! starts `Opened` and closes exactly once, either `Confirmed` (name and tags
//! committed) or `Cancelled` (dismissed). The result is delivered through the
//! [`PendingConfirmation`] handed out by [`ConfirmationGate::open`], which the
//! paste pipeline awaits.
//!
//! Presentation stays outside: hosts feed key presses into the gate and draw
//! it through a [`GateRenderer`]. A [`GateLifecycle`] gets `on_open` /
//! `on_close` callbacks around the gate's life.

use tokio::sync::oneshot;

use crate::capability::GateRequest;
use crate::store::{IMAGE_PREFIX, unix_millis};

/// Most suggestions shown at once.
pub const MAX_SUGGESTIONS: usize = 7;

/// Outcome delivered when a gate closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResult {
    /// Final note/image name (empty when cancelled)
    pub name: String,
    /// Selected tags in order of addition (empty when cancelled)
    pub tags: Vec<String>,
    /// Whether the gate was dismissed without committing
    pub cancelled: bool,
}

impl GateResult {
    /// A committed result.
    pub fn confirmed(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            cancelled: false,
        }
    }

    /// A dismissed result.
    pub fn cancelled() -> Self {
        Self {
            name: String::new(),
            tags: Vec::new(),
            cancelled: true,
        }
    }
}

/// The not-yet-known result of an open gate.
#[derive(Debug)]
pub struct PendingConfirmation {
    receiver: oneshot::Receiver<GateResult>,
}

impl PendingConfirmation {
    /// A pending result that is already decided (scripted hosts, tests).
    pub fn resolved(result: GateResult) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is alive, so this cannot fail.
        let _ = sender.send(result);
        Self { receiver }
    }

    /// Wait until the gate closes.
    ///
    /// A gate that disappears without closing counts as cancelled.
    pub async fn await_result(self) -> GateResult {
        self.receiver.await.unwrap_or_else(|_| GateResult::cancelled())
    }
}

/// Where the gate is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Accepting input
    Opened,
    /// Closed with a name and tags
    Confirmed,
    /// Dismissed
    Cancelled,
}

/// Which input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The name input
    Name,
    /// The tag input
    Tags,
}

/// Host hooks around the gate's life.
pub trait GateLifecycle {
    /// Called once when the gate opens, with the image being confirmed.
    fn on_open(&mut self, preview: &[u8]);

    /// Called once when the gate closes, on either path.
    fn on_close(&mut self);
}

/// Draws the gate's widgets. Each call is stateless: it receives everything
/// it shows.
pub trait GateRenderer {
    /// The image preview.
    fn preview(&mut self, bytes: &[u8]);

    /// The name input.
    fn name_field(&mut self, value: &str, focused: bool);

    /// The chips of selected tags.
    fn tag_chips(&mut self, tags: &[String]);

    /// The tag input.
    fn tag_field(&mut self, query: &str, focused: bool);

    /// The suggestion dropdown; only called while it is visible.
    fn suggestions(&mut self, items: &[String], highlighted: Option<usize>);
}

/// Name pre-filled when the caller has none: `pasted-image-<ms>`.
pub fn synthesized_name() -> String {
    format!("{}{}", IMAGE_PREFIX, unix_millis())
}

/// Type-ahead suggestions for the tag input.
#[derive(Debug, Clone, Default)]
pub struct TagSuggestions {
    corpus: Vec<String>,
    current: Vec<String>,
    selected: Option<usize>,
}

impl TagSuggestions {
    /// Suggestions drawn from `corpus`.
    pub fn new(corpus: Vec<String>) -> Self {
        Self {
            corpus,
            current: Vec::new(),
            selected: None,
        }
    }

    /// Refilter for `query`, resetting the highlight.
    pub fn update(&mut self, query: &str, selected_tags: &[String]) {
        self.current = filter_suggestions(&self.corpus, query, selected_tags);
        self.selected = None;
    }

    /// Currently listed suggestions.
    pub fn items(&self) -> &[String] {
        &self.current
    }

    /// Index of the highlighted suggestion.
    pub fn highlighted(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the dropdown is showing.
    pub fn is_visible(&self) -> bool {
        !self.current.is_empty()
    }

    /// Highlight the next suggestion, wrapping to the first.
    pub fn navigate_down(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let next = self.selected.map_or(0, |i| i + 1);
        self.selected = Some(if next < self.current.len() { next } else { 0 });
    }

    /// Highlight the previous suggestion, wrapping to the last.
    pub fn navigate_up(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.selected = match self.selected {
            Some(i) if i > 0 => Some(i - 1),
            _ => Some(self.current.len() - 1),
        };
    }

    /// Highlight a suggestion directly (pointer hover).
    pub fn select(&mut self, index: usize) {
        if index < self.current.len() {
            self.selected = Some(index);
        }
    }

    /// The highlighted suggestion, if any.
    pub fn current(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.current.get(i))
            .map(String::as_str)
    }

    /// Close the dropdown.
    pub fn hide(&mut self) {
        self.current.clear();
        self.selected = None;
    }
}

/// Corpus entries containing `query` (case-insensitive), minus tags already
/// selected, at most [`MAX_SUGGESTIONS`]. A blank query suggests nothing.
pub fn filter_suggestions(corpus: &[String], query: &str, selected_tags: &[String]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    corpus
        .iter()
        .filter(|tag| tag.to_lowercase().contains(&query) && !selected_tags.contains(tag))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// One open confirmation step.
pub struct ConfirmationGate<'a> {
    preview: &'a [u8],
    default_name: String,
    name: String,
    tags: Vec<String>,
    tag_query: String,
    suggestions: TagSuggestions,
    focus: Field,
    state: GateState,
    sender: Option<oneshot::Sender<GateResult>>,
    lifecycle: Option<Box<dyn GateLifecycle + 'a>>,
}

impl<'a> ConfirmationGate<'a> {
    /// Open a gate with no lifecycle hooks.
    pub fn open(request: GateRequest<'a>) -> (Self, PendingConfirmation) {
        Self::open_inner(request, None)
    }

    /// Open a gate whose `lifecycle` is notified on open and close.
    pub fn open_with_lifecycle(
        request: GateRequest<'a>,
        lifecycle: Box<dyn GateLifecycle + 'a>,
    ) -> (Self, PendingConfirmation) {
        Self::open_inner(request, Some(lifecycle))
    }

    fn open_inner(
        request: GateRequest<'a>,
        mut lifecycle: Option<Box<dyn GateLifecycle + 'a>>,
    ) -> (Self, PendingConfirmation) {
        let (sender, receiver) = oneshot::channel();
        let default_name = request
            .default_name
            .map(str::to_string)
            .unwrap_or_else(synthesized_name);
        let preview = request.buffer.as_bytes();

        if let Some(lifecycle) = lifecycle.as_mut() {
            lifecycle.on_open(preview);
        }

        let gate = Self {
            preview,
            name: default_name.clone(),
            default_name,
            tags: Vec::new(),
            tag_query: String::new(),
            suggestions: TagSuggestions::new(request.tag_corpus.to_vec()),
            focus: Field::Name,
            state: GateState::Opened,
            sender: Some(sender),
            lifecycle,
        };
        (gate, PendingConfirmation { receiver })
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether the gate still accepts input.
    pub fn is_open(&self) -> bool {
        self.state == GateState::Opened
    }

    /// Field with focus.
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Move focus to `field`. Leaving the tag field hides suggestions.
    pub fn set_focus(&mut self, field: Field) {
        if field == Field::Name {
            self.suggestions.hide();
        }
        self.focus = field;
    }

    /// Switch focus between the name and tag fields.
    pub fn toggle_focus(&mut self) {
        let next = match self.focus {
            Field::Name => Field::Tags,
            Field::Tags => Field::Name,
        };
        self.set_focus(next);
    }

    // ==================== Name ====================

    /// Raw content of the name field.
    pub fn name_value(&self) -> &str {
        &self.name
    }

    /// Replace the name field's content.
    pub fn set_name(&mut self, value: &str) {
        self.name = value.to_string();
    }

    /// Name that would be committed: trimmed, spaces replaced by `_`, or the
    /// default when blank.
    pub fn final_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            self.default_name.clone()
        } else {
            trimmed.replace(' ', "_")
        }
    }

    // ==================== Tags ====================

    /// Selected tags, in order of addition.
    pub fn selected_tags(&self) -> &[String] {
        &self.tags
    }

    /// Add a tag unless it is empty or already selected (exact match).
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag by exact value.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Text typed in the tag field.
    pub fn tag_query(&self) -> &str {
        &self.tag_query
    }

    /// Replace the tag field's text and refresh suggestions.
    pub fn set_tag_query(&mut self, query: &str) {
        self.tag_query = query.to_string();
        self.suggestions.update(&self.tag_query, &self.tags);
    }

    /// Suggestion list state.
    pub fn suggestions(&self) -> &TagSuggestions {
        &self.suggestions
    }

    /// Highlight the next suggestion.
    pub fn navigate_down(&mut self) {
        self.suggestions.navigate_down();
    }

    /// Highlight the previous suggestion.
    pub fn navigate_up(&mut self) {
        self.suggestions.navigate_up();
    }

    /// Highlight a suggestion directly.
    pub fn select_suggestion(&mut self, index: usize) {
        self.suggestions.select(index);
    }

    /// Add the highlighted suggestion, if any, and clear the tag field.
    pub fn apply_highlighted(&mut self) -> bool {
        let Some(tag) = self.suggestions.current().map(str::to_string) else {
            return false;
        };
        self.add_tag(&tag);
        self.clear_tag_field();
        true
    }

    fn clear_tag_field(&mut self) {
        self.tag_query.clear();
        self.suggestions.hide();
    }

    // ==================== Closing ====================

    /// Enter key.
    ///
    /// In the tag field: apply the highlighted suggestion, or add the typed
    /// text as a tag (taken as typed, spaces kept). With nothing typed and
    /// nothing highlighted, or outside the tag field, the gate confirms.
    pub fn press_enter(&mut self) {
        if !self.is_open() {
            return;
        }
        if self.focus == Field::Tags {
            if self.apply_highlighted() {
                return;
            }
            let typed = self.tag_query.trim().to_string();
            if !typed.is_empty() {
                self.add_tag(&typed);
                self.clear_tag_field();
                return;
            }
        }
        self.confirm();
    }

    /// Commit the current name and tags.
    pub fn confirm(&mut self) {
        let result = GateResult::confirmed(self.final_name(), self.tags.clone());
        self.close(GateState::Confirmed, result);
    }

    /// Close without committing (focus lost, escape).
    pub fn dismiss(&mut self) {
        self.close(GateState::Cancelled, GateResult::cancelled());
    }

    fn close(&mut self, state: GateState, result: GateResult) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        self.state = state;
        self.suggestions.hide();
        log::debug!("Confirmation gate closed: {:?}", state);
        // A dropped receiver means nobody waits for the answer any more.
        let _ = sender.send(result);
        if let Some(lifecycle) = self.lifecycle.as_mut() {
            lifecycle.on_close();
        }
    }

    // ==================== Presentation ====================

    /// Draw every widget through `renderer`.
    pub fn render(&self, renderer: &mut dyn GateRenderer) {
        renderer.preview(self.preview);
        renderer.name_field(&self.name, self.focus == Field::Name);
        renderer.tag_chips(&self.tags);
        renderer.tag_field(&self.tag_query, self.focus == Field::Tags);
        if self.suggestions.is_visible() {
            renderer.suggestions(self.suggestions.items(), self.suggestions.highlighted());
        }
    }
}

impl Drop for ConfirmationGate<'_> {
    fn drop(&mut self) {
        self.dismiss();
    }
}
