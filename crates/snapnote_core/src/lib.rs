#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Host capabilities (clipboard, editor, notifications, gate host)
pub mod capability;

/// Configuration options
pub mod config;

/// Error (common error types)
pub mod error;

/// Frontmatter block building and parsing
pub mod frontmatter;

/// Filesystem abstraction
pub mod fs;

/// Interactive confirmation (name and tags)
pub mod gate;

/// The paste pipeline
pub mod orchestrator;

/// Path utilities for image/note paths and relative links
pub mod path_utils;

/// Image and note persistence
pub mod store;

/// Tag corpus of the vault
pub mod tags;

/// Note templates
pub mod template;

#[cfg(test)]
pub mod test_utils;
