//! Filesystem abstraction module.
//!
//! The vault reads and writes through the `FileSystem` trait, so it can sit on
//! the real disk or on an in-memory implementation in tests.

#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(not(target_arch = "wasm32"))]
pub use native::RealFileSystem;

use std::io::Result;
use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations
pub trait FileSystem: Send + Sync {
    /// Reads the file content (templates, documents)
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Reads raw bytes (images)
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>>;

    /// Overwrites a file (config, editing surface)
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Creates a text file ONLY if it doesn't exist (notes).
    /// Must fail with `ErrorKind::AlreadyExists` otherwise.
    fn create_new(&self, path: &Path, content: &str) -> Result<()>;

    /// Creates a binary file ONLY if it doesn't exist (pasted images).
    /// Must fail with `ErrorKind::AlreadyExists` otherwise.
    fn create_new_binary(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Checks if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Markdown files directly inside `dir`
    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Every entry directly inside `dir`
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Markdown files in `dir` and all of its subdirectories.
    ///
    /// Subdirectories that cannot be listed are skipped.
    fn list_md_files_recursive(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut all_files = self.list_md_files(dir)?;

        for entry in self.list_files(dir).unwrap_or_default() {
            if !self.is_dir(&entry) {
                continue;
            }
            match self.list_md_files_recursive(&entry) {
                Ok(files) => all_files.extend(files),
                Err(e) => log::debug!("Skipping {}: {}", entry.display(), e),
            }
        }

        Ok(all_files)
    }
}
