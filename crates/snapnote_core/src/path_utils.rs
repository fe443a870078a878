//! Path utilities for placing images and notes inside the vault.
//!
//! All paths here are vault-relative strings separated by `/`, the way the
//! document store addresses files. Folder identifiers are either empty (vault
//! root) or a single path segment.

/// Separator used between a folder and a filename.
pub const PATH_SEPARATOR: &str = "/";

const PARENT_PREFIX: &str = "../";

/// Extensions accepted by [`is_image_path`].
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp", ".svg"];

/// Resolve where an image with `filename` is stored.
///
/// # Example
/// ```
/// use snapnote_core::path_utils::resolve_image_path;
///
/// assert_eq!(resolve_image_path("x.png", ""), "x.png");
/// assert_eq!(resolve_image_path("x.png", "media"), "media/x.png");
/// ```
pub fn resolve_image_path(filename: &str, image_folder: &str) -> String {
    join_folder(image_folder, filename)
}

/// Resolve where a note with `filename` is stored.
pub fn resolve_note_path(filename: &str, note_folder: &str) -> String {
    join_folder(note_folder, filename)
}

fn join_folder(folder: &str, filename: &str) -> String {
    if folder.is_empty() {
        filename.to_string()
    } else {
        format!("{}{}{}", folder, PATH_SEPARATOR, filename)
    }
}

/// Compute the image reference embedded in a note.
///
/// Rules, in order:
/// 1. note folder set and equal to the image folder: bare image filename
/// 2. note folder set and different: `../` + image path
/// 3. note folder empty: image path unchanged
///
/// Only one level of nesting is handled; `a/b` against `c` yields a single
/// `../`, which does not resolve.
///
/// # Example
/// ```
/// use snapnote_core::path_utils::relative_link_path;
///
/// assert_eq!(relative_link_path("media/x.png", "media/n.md", "media", "media"), "x.png");
/// assert_eq!(relative_link_path("x.png", "notes/n.md", "", "notes"), "../x.png");
/// assert_eq!(relative_link_path("media/x.png", "n.md", "media", ""), "media/x.png");
/// ```
pub fn relative_link_path(
    image_path: &str,
    _note_path: &str,
    image_folder: &str,
    note_folder: &str,
) -> String {
    if !note_folder.is_empty() && note_folder == image_folder {
        last_segment(image_path).to_string()
    } else if !note_folder.is_empty() {
        format!("{}{}", PARENT_PREFIX, image_path)
    } else {
        image_path.to_string()
    }
}

/// Final `/`-separated segment of a path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}

/// Folder part of a vault path, or `""` for files at the vault root.
pub fn parent_folder(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Filename without its last extension.
pub fn file_stem(path: &str) -> &str {
    let name = last_segment(path);
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Strip a folder prefix added by [`resolve_image_path`] / [`resolve_note_path`].
pub fn strip_folder<'a>(path: &'a str, folder: &str) -> &'a str {
    if folder.is_empty() {
        return path;
    }
    path.strip_prefix(folder)
        .and_then(|rest| rest.strip_prefix(PATH_SEPARATOR))
        .unwrap_or(path)
}

/// Normalize a configured folder identifier (surrounding separators and
/// whitespace removed).
pub fn normalize_folder(folder: &str) -> String {
    folder.trim().trim_matches('/').to_string()
}

/// Whether a path names an image, judged by its extension (case-insensitive).
pub fn is_image_path(path: &str) -> bool {
    let name = last_segment(path);
    match name.rfind('.') {
        Some(idx) => {
            let ext = name[idx..].to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_at_root() {
        assert_eq!(resolve_image_path("a.png", ""), "a.png");
        assert_eq!(resolve_note_path("a.md", ""), "a.md");
    }

    #[test]
    fn test_resolve_in_folder() {
        assert_eq!(resolve_image_path("a.png", "attachments"), "attachments/a.png");
        assert_eq!(resolve_note_path("a.md", "notes"), "notes/a.md");
    }

    #[test]
    fn test_resolve_round_trip() {
        for folder in ["", "media", "Images"] {
            let path = resolve_image_path("pasted-image-1.png", folder);
            assert_eq!(strip_folder(&path, folder), "pasted-image-1.png");
        }
    }

    #[test]
    fn test_link_same_folder_is_bare_filename() {
        assert_eq!(
            relative_link_path("media/x.png", "media/x.md", "media", "media"),
            "x.png"
        );
    }

    #[test]
    fn test_link_note_in_subfolder_image_at_root() {
        assert_eq!(
            relative_link_path("pasted-image-1.png", "notes/n.md", "", "notes"),
            "../pasted-image-1.png"
        );
    }

    #[test]
    fn test_link_different_subfolders() {
        assert_eq!(
            relative_link_path("media/x.png", "notes/n.md", "media", "notes"),
            "../media/x.png"
        );
    }

    #[test]
    fn test_link_note_at_root_keeps_image_path() {
        assert_eq!(relative_link_path("media/x.png", "n.md", "media", ""), "media/x.png");
        assert_eq!(relative_link_path("x.png", "n.md", "", ""), "x.png");
    }

    #[test]
    fn test_link_deep_nesting_is_single_level() {
        // Known limitation: only one `../` is ever produced.
        assert_eq!(
            relative_link_path("a/b/x.png", "c/d/n.md", "a/b", "c/d"),
            "../a/b/x.png"
        );
    }

    #[test]
    fn test_file_stem_and_parent() {
        assert_eq!(file_stem("media/photo.final.png"), "photo.final");
        assert_eq!(file_stem("README"), "README");
        assert_eq!(parent_folder("media/photo.png"), "media");
        assert_eq!(parent_folder("photo.png"), "");
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path("assets/images/photo.PNG"));
        assert!(is_image_path("a.jpeg"));
        assert!(is_image_path("vector.svg"));
        assert!(!is_image_path("note.md"));
        assert!(!is_image_path("png"));
    }

    #[test]
    fn test_normalize_folder() {
        assert_eq!(normalize_folder("/media/"), "media");
        assert_eq!(normalize_folder("  "), "");
    }
}
