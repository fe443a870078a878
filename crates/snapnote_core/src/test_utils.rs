//! Test utilities for snapnote_core
//!
//! This module provides shared testing infrastructure: an in-memory mock
//! filesystem that records every write, plus recording fakes for the host
//! capabilities.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::capability::{Clipboard, ConfirmationHost, EditingSurface, GateRequest, Notifier};
use crate::error::{Result, SnapnoteError};
use crate::fs::FileSystem;
use crate::gate::{ConfirmationGate, GateResult, PendingConfirmation};
use crate::store::ImageBuffer;

#[derive(Default)]
struct MockState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    writes: Vec<String>,
    fail_writes: Vec<PathBuf>,
}

/// A mock filesystem for testing.
///
/// Uses `Arc<Mutex<..>>` so clones share the same underlying storage. Every
/// mutating call is appended to a write log (`"mkdir <path>"`,
/// `"binary <path>"`, `"text <path>"`) for ordering assertions.
#[derive(Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the mock filesystem (builder pattern).
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
        self
    }

    /// Add a binary file to the mock filesystem (builder pattern).
    pub fn with_binary(self, path: &str, content: &[u8]) -> Self {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(PathBuf::from(path), content.to_vec());
        self
    }

    /// Add an existing directory (builder pattern).
    pub fn with_dir(self, path: &str) -> Self {
        self.state.lock().unwrap().dirs.insert(PathBuf::from(path));
        self
    }

    /// Make every write whose path starts with `prefix` fail.
    pub fn failing_writes_under(self, prefix: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_writes
            .push(PathBuf::from(prefix));
        self
    }

    /// Get the content of a file as text (for test assertions).
    pub fn get_content(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(&PathBuf::from(path))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the raw content of a file (for test assertions).
    pub fn get_binary(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(&PathBuf::from(path))
            .cloned()
    }

    /// Ordered log of mutating calls.
    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    fn check_writable(state: &MockState, path: &Path) -> io::Result<()> {
        if state.fail_writes.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "write rejected",
            ));
        }
        Ok(())
    }

    fn insert(&self, kind: &str, path: &Path, content: &[u8], create_only: bool) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state, path)?;
        if create_only && state.files.contains_key(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "File exists"));
        }
        state.files.insert(path.to_path_buf(), content.to_vec());
        state.writes.push(format!("{} {}", kind, path.display()));
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.state.lock().unwrap();
        let bytes = state
            .files
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "File not found"))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        self.insert("text", path, content.as_bytes(), false)
    }

    fn create_new(&self, path: &Path, content: &str) -> io::Result<()> {
        self.insert("text", path, content.as_bytes(), true)
    }

    fn list_md_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        let mut result: Vec<PathBuf> = state
            .files
            .keys()
            .filter(|path| {
                path.parent() == Some(dir) && path.extension().is_some_and(|ext| ext == "md")
            })
            .cloned()
            .collect();
        result.sort();
        Ok(result)
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path)
            || state.dirs.contains(path)
            || state.files.keys().any(|file| file.starts_with(path))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state, path)?;
        state.dirs.insert(path.to_path_buf());
        state.writes.push(format!("mkdir {}", path.display()));
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.contains(path)
            || state
                .files
                .keys()
                .any(|file| file != path && file.starts_with(path))
    }

    fn read_binary(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "File not found"))
    }

    fn create_new_binary(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        self.insert("binary", path, content, true)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        let mut children = BTreeSet::new();
        for path in state.files.keys().chain(state.dirs.iter()) {
            if let Ok(rest) = path.strip_prefix(dir)
                && let Some(first) = rest.components().next()
            {
                children.insert(dir.join(first));
            }
        }
        Ok(children.into_iter().collect())
    }
}

/// Clipboard fake holding an optional image.
#[derive(Default)]
pub struct MockClipboard {
    image: Option<Vec<u8>>,
}

impl MockClipboard {
    /// Clipboard that holds `bytes`.
    pub fn with_image(bytes: &[u8]) -> Self {
        Self {
            image: Some(bytes.to_vec()),
        }
    }

    /// Clipboard with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Clipboard for MockClipboard {
    fn has_image(&self) -> bool {
        self.image.is_some()
    }

    fn read_image(&self) -> Result<ImageBuffer> {
        self.image
            .clone()
            .map(ImageBuffer::new)
            .ok_or_else(|| SnapnoteError::ImageUnavailable("Clipboard image is empty".to_string()))
    }
}

/// Editing surface fake recording inserted text.
#[derive(Default)]
pub struct MockSurface {
    focused: bool,
    inserted: Mutex<Vec<String>>,
}

impl MockSurface {
    /// A focused surface.
    pub fn focused() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    /// No surface has focus.
    pub fn unfocused() -> Self {
        Self::default()
    }

    /// Text inserted so far.
    pub fn inserted(&self) -> Vec<String> {
        self.inserted.lock().unwrap().clone()
    }
}

impl EditingSurface for MockSurface {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn insert_at_cursor(&self, text: &str) -> Result<()> {
        if !self.focused {
            return Err(SnapnoteError::NoActiveSurface);
        }
        self.inserted.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Notifier fake recording every notification as a string.
#[derive(Default)]
pub struct MockNotifier {
    events: Mutex<Vec<String>>,
}

impl MockNotifier {
    /// Recorded notifications: `"success"`, `"no_image"`, `"error: <msg>"`.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn success(&self) {
        self.events.lock().unwrap().push("success".to_string());
    }

    fn no_image(&self) {
        self.events.lock().unwrap().push("no_image".to_string());
    }

    fn error(&self, description: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error: {}", description));
    }
}

/// What a [`ScriptedGateHost`] was asked to show.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Name the gate was pre-filled with
    pub default_name: Option<String>,
    /// Suggestions offered
    pub tag_corpus: Vec<String>,
    /// Size of the previewed image
    pub preview_len: usize,
}

/// Gate host that drives a real [`ConfirmationGate`] to a scripted answer.
pub struct ScriptedGateHost {
    answer: GateResult,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGateHost {
    /// Host that answers every gate with `answer`.
    pub fn answering(answer: GateResult) -> Self {
        Self {
            answer,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Host for flows that should never open a gate; dismisses if asked.
    pub fn never() -> Self {
        Self::answering(GateResult::cancelled())
    }

    /// Number of gates opened.
    pub fn opened(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl ConfirmationHost for ScriptedGateHost {
    fn open(&self, request: GateRequest<'_>) -> PendingConfirmation {
        self.requests.lock().unwrap().push(RecordedRequest {
            default_name: request.default_name.map(str::to_string),
            tag_corpus: request.tag_corpus.to_vec(),
            preview_len: request.buffer.len(),
        });

        let (mut gate, pending) = ConfirmationGate::open(request);
        if self.answer.cancelled {
            gate.dismiss();
        } else {
            gate.set_name(&self.answer.name);
            for tag in &self.answer.tags {
                gate.add_tag(tag);
            }
            gate.confirm();
        }
        pending
    }
}
