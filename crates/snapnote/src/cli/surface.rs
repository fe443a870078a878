//! A markdown file as the editing surface
//!
//! The link to a new note goes into the file given with `--insert-into`, at
//! the start of `--line` or at the end. Without a file nothing is focused.

use std::path::{Path, PathBuf};

use snapnote_core::capability::EditingSurface;
use snapnote_core::error::{Result, SnapnoteError};
use snapnote_core::fs::{FileSystem, RealFileSystem};

/// Editing surface over one markdown file.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFileSurface {
    path: Option<PathBuf>,
    line: Option<usize>,
}

impl MarkdownFileSurface {
    /// Surface for `path`, cursor at the start of `line` (1-based) or at the end.
    pub fn new(path: Option<PathBuf>, line: Option<usize>) -> Self {
        Self { path, line }
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let fs = RealFileSystem;
        let content = if fs.exists(path) {
            fs.read_to_string(path)
                .map_err(|e| SnapnoteError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                })?
        } else {
            String::new()
        };

        let updated = insert_at(&content, text, self.line);
        fs.write_file(path, &updated)
            .map_err(|e| SnapnoteError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        log::debug!("Inserted '{}' into {}", text, path.display());
        Ok(())
    }
}

impl EditingSurface for MarkdownFileSurface {
    fn is_focused(&self) -> bool {
        self.path.is_some()
    }

    fn insert_at_cursor(&self, text: &str) -> Result<()> {
        match &self.path {
            Some(path) => self.write(path, text),
            None => Err(SnapnoteError::NoActiveSurface),
        }
    }
}

/// `content` with `text` on its own line before line `line` (1-based), or
/// appended when `line` is `None` or past the end.
pub fn insert_at(content: &str, text: &str, line: Option<usize>) -> String {
    let mut lines: Vec<&str> = content.lines().collect();
    let index = line
        .map(|n| n.saturating_sub(1))
        .filter(|&i| i < lines.len())
        .unwrap_or(lines.len());
    lines.insert(index, text);

    let mut result = lines.join("\n");
    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_end() {
        assert_eq!(insert_at("# Day\nnotes", "![[img]]", None), "# Day\nnotes\n![[img]]\n");
        assert_eq!(insert_at("", "![[img]]", None), "![[img]]\n");
    }

    #[test]
    fn test_insert_before_line() {
        assert_eq!(insert_at("a\nb\nc\n", "X", Some(2)), "a\nX\nb\nc\n");
        assert_eq!(insert_at("a\nb", "X", Some(1)), "X\na\nb\n");
        assert_eq!(insert_at("a\nb", "X", Some(0)), "X\na\nb\n");
    }

    #[test]
    fn test_line_past_end_appends() {
        assert_eq!(insert_at("a", "X", Some(9)), "a\nX\n");
    }

    #[test]
    fn test_no_file_is_unfocused() {
        let surface = MarkdownFileSurface::default();
        assert!(!surface.is_focused());
        assert!(matches!(
            surface.insert_at_cursor("x"),
            Err(SnapnoteError::NoActiveSurface)
        ));
    }

    #[test]
    fn test_writes_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.md");
        std::fs::write(&path, "# Today\n").unwrap();

        let surface = MarkdownFileSurface::new(Some(path.clone()), None);
        assert!(surface.is_focused());
        surface.insert_at_cursor("![[shot]]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Today\n![[shot]]\n");
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.md");
        MarkdownFileSurface::new(Some(path.clone()), Some(3))
            .insert_at_cursor("![[a]]")
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "![[a]]\n");
    }
}
