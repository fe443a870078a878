//! Native filesystem implementation.
//!
//! Only available on non-WASM targets.

use std::fs::{self, OpenOptions};
use std::io::{Result, Write};
use std::path::{Path, PathBuf};

use super::FileSystem;

/// The vault on disk, through `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Write `content` to a file that must not exist yet. The existence check
    /// and the creation are one operation.
    fn create_exclusive(path: &Path, content: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content)
    }

    fn entries(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        Self::create_exclusive(path, content.as_bytes())
    }

    fn create_new_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        Self::create_exclusive(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
    }

    fn list_md_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Self::entries(dir)?;
        files.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"));
        Ok(files)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Self::entries(dir)
    }
}
