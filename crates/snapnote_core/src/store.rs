//! Persisting pasted images and their notes into the vault.
//!
//! [`Vault`] is the document store: vault-relative, `/`-separated paths on
//! top of a [`FileSystem`]. [`ImageStore`] and [`NoteStore`] decide filenames
//! and content and write through it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{Result, SnapnoteError};
use crate::frontmatter;
use crate::fs::FileSystem;
use crate::path_utils::{
    PATH_SEPARATOR, parent_folder, relative_link_path, resolve_image_path, resolve_note_path,
};
use crate::template::{Template, TemplateContext};

/// Filename prefix of images pasted without a name.
pub const IMAGE_PREFIX: &str = "pasted-image-";
/// Extension of pasted images.
pub const IMAGE_EXTENSION: &str = ".png";
/// Filename prefix of notes created without a name.
pub const NOTE_PREFIX: &str = "Image Note ";
/// Extension of notes.
pub const NOTE_EXTENSION: &str = ".md";

/// Source of the `<unix-ms>` part of synthesized filenames.
pub type Clock = fn() -> i64;

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Raw image bytes captured for one paste. Read-only once captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer(Vec<u8>);

impl ImageBuffer {
    /// Wrap captured bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The captured bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A markdown vault rooted at a directory.
pub struct Vault<FS> {
    fs: FS,
    root: PathBuf,
}

impl<FS: FileSystem> Vault<FS> {
    /// Open a vault at `root` (not created or checked).
    pub fn new(fs: FS, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    /// Vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Underlying filesystem.
    pub fn fs(&self) -> &FS {
        &self.fs
    }

    /// Filesystem path of a vault path.
    pub fn full_path(&self, path: &str) -> PathBuf {
        path.split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Vault path of a filesystem path, if it lies inside the vault.
    pub fn vault_path(&self, full: &Path) -> Option<String> {
        let relative = full.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join(PATH_SEPARATOR))
    }

    /// Whether a file or folder exists.
    pub fn path_exists(&self, path: &str) -> bool {
        self.fs.exists(&self.full_path(path))
    }

    /// Create a folder (and its parents).
    pub fn create_folder(&self, path: &str) -> Result<()> {
        log::debug!("Creating folder '{}'", path);
        self.fs
            .create_dir_all(&self.full_path(path))
            .map_err(|e| store_error(path, e))
    }

    /// Create `folder` unless it is the root or already exists.
    pub fn ensure_folder(&self, folder: &str) -> Result<()> {
        if !folder.is_empty() && !self.path_exists(folder) {
            self.create_folder(folder)?;
        }
        Ok(())
    }

    /// Create a new binary file; fails if it exists.
    pub fn create_binary(&self, path: &str, bytes: &[u8]) -> Result<()> {
        log::debug!("Writing {} bytes to '{}'", bytes.len(), path);
        self.fs
            .create_new_binary(&self.full_path(path), bytes)
            .map_err(|e| store_error(path, e))
    }

    /// Create a new text file; fails if it exists.
    pub fn create_text(&self, path: &str, content: &str) -> Result<()> {
        log::debug!("Writing note '{}'", path);
        self.fs
            .create_new(&self.full_path(path), content)
            .map_err(|e| store_error(path, e))
    }

    /// Read a text file.
    pub fn read_text(&self, path: &str) -> Result<String> {
        let full = self.full_path(path);
        self.fs
            .read_to_string(&full)
            .map_err(|e| SnapnoteError::FileRead {
                path: full,
                source: e,
            })
    }

    /// Read a binary file.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.full_path(path);
        self.fs
            .read_binary(&full)
            .map_err(|e| SnapnoteError::FileRead {
                path: full,
                source: e,
            })
    }

    /// All markdown documents, as sorted vault paths.
    ///
    /// Anything under a dot-folder (`.obsidian`, `.trash`, ...) is skipped.
    pub fn list_markdown_documents(&self) -> Result<Vec<String>> {
        let files = self.fs.list_md_files_recursive(&self.root)?;
        let mut documents: Vec<String> = files
            .iter()
            .filter_map(|f| self.vault_path(f))
            .filter(|p| !p.split(PATH_SEPARATOR).any(|s| s.starts_with('.')))
            .collect();
        documents.sort();
        documents.dedup();
        Ok(documents)
    }
}

fn store_error(path: &str, source: std::io::Error) -> SnapnoteError {
    if source.kind() == ErrorKind::AlreadyExists {
        SnapnoteError::AlreadyExists(path.to_string())
    } else {
        SnapnoteError::StoreWrite {
            path: path.to_string(),
            source,
        }
    }
}

/// Writes pasted images into the configured image folder.
pub struct ImageStore<'a, FS> {
    vault: &'a Vault<FS>,
    settings: &'a Settings,
    clock: Clock,
}

impl<'a, FS: FileSystem> ImageStore<'a, FS> {
    /// Image store for one operation.
    pub fn new(vault: &'a Vault<FS>, settings: &'a Settings) -> Self {
        Self {
            vault,
            settings,
            clock: unix_millis,
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Save `buffer` as `<filename>.png`, or `pasted-image-<ms>.png` without a
    /// name, and return its vault path.
    pub fn save(&self, buffer: &ImageBuffer, filename: Option<&str>) -> Result<String> {
        let filename = match filename {
            Some(name) => format!("{}{}", name, IMAGE_EXTENSION),
            None => format!("{}{}{}", IMAGE_PREFIX, (self.clock)(), IMAGE_EXTENSION),
        };
        let image_path = resolve_image_path(&filename, &self.settings.image_folder);

        self.vault.ensure_folder(&self.settings.image_folder)?;
        self.vault.create_binary(&image_path, buffer.as_bytes())?;
        Ok(image_path)
    }
}

/// Writes the note that embeds a pasted image.
pub struct NoteStore<'a, FS> {
    vault: &'a Vault<FS>,
    settings: &'a Settings,
    clock: Clock,
}

impl<'a, FS: FileSystem> NoteStore<'a, FS> {
    /// Note store for one operation.
    pub fn new(vault: &'a Vault<FS>, settings: &'a Settings) -> Self {
        Self {
            vault,
            settings,
            clock: unix_millis,
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Create the note for an image just saved by [`ImageStore::save`].
    ///
    /// Returns the note filename (not its path).
    pub fn create(&self, image_path: &str, name: Option<&str>, tags: &[String]) -> Result<String> {
        self.write_note(image_path, &self.settings.image_folder, name, tags)
    }

    /// Create a note for an image that already lives in the vault.
    ///
    /// The link is computed against the image's own folder rather than the
    /// configured image folder.
    pub fn create_from_existing_file(
        &self,
        existing_path: &str,
        name: Option<&str>,
        tags: &[String],
    ) -> Result<String> {
        self.write_note(existing_path, parent_folder(existing_path), name, tags)
    }

    fn write_note(
        &self,
        image_path: &str,
        image_folder: &str,
        name: Option<&str>,
        tags: &[String],
    ) -> Result<String> {
        let note_filename = match name {
            Some(name) => format!("{}{}", name, NOTE_EXTENSION),
            None => format!("{}{}{}", NOTE_PREFIX, (self.clock)(), NOTE_EXTENSION),
        };
        let note_folder = &self.settings.image_notes_folder;
        let note_path = resolve_note_path(&note_filename, note_folder);
        let content = self.render_content(image_path, image_folder, &note_path, &note_filename, tags);

        self.vault.ensure_folder(note_folder)?;
        self.vault.create_text(&note_path, &content)?;
        Ok(note_filename)
    }

    /// Full note text: frontmatter (or merged template) plus the image embed.
    pub fn render_content(
        &self,
        image_path: &str,
        image_folder: &str,
        note_path: &str,
        note_filename: &str,
        tags: &[String],
    ) -> String {
        let link = relative_link_path(
            image_path,
            note_path,
            image_folder,
            &self.settings.image_notes_folder,
        );
        let embed = format!("![]({})", link);
        let asset = self.settings.include_asset_property.then_some(image_path);

        match self.load_template(note_filename) {
            Some(template) => {
                let merged = frontmatter::build(tags, asset, Some(&template));
                if merged.is_empty() || merged.ends_with('\n') {
                    format!("{}{}", merged, embed)
                } else {
                    format!("{}\n{}", merged, embed)
                }
            }
            None => {
                let block = frontmatter::build(tags, asset, None);
                if block.is_empty() {
                    embed
                } else {
                    format!("{}\n{}", block, embed)
                }
            }
        }
    }

    fn load_template(&self, note_filename: &str) -> Option<String> {
        if self.settings.template_file.is_empty() {
            return None;
        }
        match Template::load(self.vault, &self.settings.template_file) {
            Ok(template) => {
                let title = note_filename
                    .strip_suffix(NOTE_EXTENSION)
                    .unwrap_or(note_filename);
                Some(template.render(&TemplateContext::new().with_title(title)))
            }
            Err(e) => {
                log::warn!("{}; creating note without template", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockFileSystem;

    fn fixed_clock() -> i64 {
        1700000000000
    }

    fn settings(image_folder: &str, note_folder: &str) -> Settings {
        Settings {
            image_folder: image_folder.to_string(),
            image_notes_folder: note_folder.to_string(),
            ..Settings::default()
        }
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_save_image_synthesized_name() {
        let fs = MockFileSystem::new();
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("", "");
        let store = ImageStore::new(&vault, &settings).with_clock(fixed_clock);

        let path = store.save(&ImageBuffer::new(vec![1, 2, 3]), None).unwrap();
        assert_eq!(path, "pasted-image-1700000000000.png");
        assert_eq!(fs.get_binary(&path), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_save_image_in_folder_creates_folder_first() {
        let fs = MockFileSystem::new();
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("media", "");
        let buffer = ImageBuffer::new(vec![9, 9]);

        let path = ImageStore::new(&vault, &settings)
            .save(&buffer, Some("shot"))
            .unwrap();
        assert_eq!(path, "media/shot.png");
        assert_eq!(fs.writes(), vec!["mkdir media", "binary media/shot.png"]);
        assert_eq!(buffer.as_bytes(), &[9, 9]);
    }

    #[test]
    fn test_existing_folder_is_not_recreated() {
        let fs = MockFileSystem::new().with_dir("media");
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("media", "");

        ImageStore::new(&vault, &settings)
            .save(&ImageBuffer::new(vec![0]), Some("a"))
            .unwrap();
        assert_eq!(fs.writes(), vec!["binary media/a.png"]);
    }

    #[test]
    fn test_save_image_refuses_to_overwrite() {
        let fs = MockFileSystem::new().with_binary("a.png", &[1]);
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("", "");

        let err = ImageStore::new(&vault, &settings)
            .save(&ImageBuffer::new(vec![2]), Some("a"))
            .unwrap_err();
        assert!(matches!(err, SnapnoteError::AlreadyExists(_)));
        assert_eq!(fs.get_binary("a.png"), Some(vec![1]));
    }

    #[test]
    fn test_create_note_plain_embed() {
        let fs = MockFileSystem::new();
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("", "");

        let filename = NoteStore::new(&vault, &settings)
            .with_clock(fixed_clock)
            .create("pasted-image-1.png", None, &[])
            .unwrap();
        assert_eq!(filename, "Image Note 1700000000000.md");
        assert_eq!(
            fs.get_content("Image Note 1700000000000.md").as_deref(),
            Some("![](pasted-image-1.png)")
        );
    }

    #[test]
    fn test_create_note_in_subfolder_links_up() {
        let fs = MockFileSystem::new();
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("", "notes");

        let filename = NoteStore::new(&vault, &settings)
            .create("pasted-image-1.png", Some("n"), &[])
            .unwrap();
        assert_eq!(filename, "n.md");
        assert_eq!(
            fs.get_content("notes/n.md").as_deref(),
            Some("![](../pasted-image-1.png)")
        );
        assert_eq!(fs.writes(), vec!["mkdir notes", "text notes/n.md"]);
    }

    #[test]
    fn test_create_note_with_asset_and_tags() {
        let fs = MockFileSystem::new();
        let vault = Vault::new(fs.clone(), "");
        let settings = Settings {
            include_asset_property: true,
            ..settings("media", "media")
        };

        NoteStore::new(&vault, &settings)
            .create("media/x.png", Some("x"), &tags(&["a", "b"]))
            .unwrap();
        assert_eq!(
            fs.get_content("media/x.md").as_deref(),
            Some("---\nasset: \"[[media/x.png]]\"\ntags: [\"a\", \"b\"]\n---\n\n![](x.png)")
        );
    }

    #[test]
    fn test_create_note_with_template() {
        let fs = MockFileSystem::new()
            .with_file("Templates/Image.md", "---\nstatus: new\n---\n# {{title}}\n");
        let vault = Vault::new(fs.clone(), "");
        let settings = Settings {
            template_file: "Templates/Image".to_string(),
            ..settings("", "")
        };

        NoteStore::new(&vault, &settings)
            .create("img1.png", Some("img1"), &tags(&["t"]))
            .unwrap();
        assert_eq!(
            fs.get_content("img1.md").as_deref(),
            Some("---\nstatus: new\ntags: [\"t\"]\n---\n# img1\n![](img1.png)")
        );
    }

    #[test]
    fn test_missing_template_falls_back() {
        let fs = MockFileSystem::new();
        let vault = Vault::new(fs.clone(), "");
        let settings = Settings {
            template_file: "Templates/Gone".to_string(),
            ..settings("", "")
        };

        NoteStore::new(&vault, &settings)
            .create("a.png", Some("a"), &tags(&["t"]))
            .unwrap();
        assert_eq!(
            fs.get_content("a.md").as_deref(),
            Some("---\ntags: [\"t\"]\n---\n\n![](a.png)")
        );
    }

    #[test]
    fn test_note_from_existing_file_uses_its_folder() {
        let fs = MockFileSystem::new().with_binary("attachments/photo.jpg", &[1]);
        let vault = Vault::new(fs.clone(), "");
        let settings = settings("media", "attachments");

        let filename = NoteStore::new(&vault, &settings)
            .create_from_existing_file("attachments/photo.jpg", Some("photo"), &[])
            .unwrap();
        assert_eq!(filename, "photo.md");
        assert_eq!(
            fs.get_content("attachments/photo.md").as_deref(),
            Some("![](photo.jpg)")
        );
        // Only the note is written
        assert_eq!(fs.writes(), vec!["text attachments/photo.md"]);
    }

    #[test]
    fn test_note_write_failure_is_store_error() {
        let fs = MockFileSystem::new().failing_writes_under("notes");
        let vault = Vault::new(fs, "");
        let settings = settings("", "notes");

        let err = NoteStore::new(&vault, &settings)
            .create("a.png", None, &[])
            .unwrap_err();
        assert_eq!(err.kind(), "StoreWriteFailure");
    }

    #[test]
    fn test_vault_paths() {
        let vault = Vault::new(MockFileSystem::new(), "/home/me/vault");
        let full = vault.full_path("media/x.png");
        assert_eq!(full, PathBuf::from("/home/me/vault/media/x.png"));
        assert_eq!(vault.vault_path(&full).as_deref(), Some("media/x.png"));
        assert_eq!(vault.vault_path(Path::new("/elsewhere/x.png")), None);
    }

    #[test]
    fn test_list_markdown_documents_skips_dot_folders() {
        let fs = MockFileSystem::new()
            .with_file("a.md", "")
            .with_file("notes/b.md", "")
            .with_file(".obsidian/c.md", "")
            .with_file("media/x.png", "");
        let vault = Vault::new(fs, "");
        assert_eq!(
            vault.list_markdown_documents().unwrap(),
            vec!["a.md", "notes/b.md"]
        );
    }
}
