//! Tag corpus collected from the vault, offered as gate suggestions.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::frontmatter::{self, TAGS_KEY};
use crate::fs::FileSystem;
use crate::store::Vault;

/// Sorted, de-duplicated tags known to the vault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: Vec<String>,
}

impl TagIndex {
    /// Collect tags from every markdown document in the vault.
    ///
    /// Documents that cannot be read or whose frontmatter does not parse
    /// contribute nothing; the rest of the vault is still indexed.
    pub fn collect<FS: FileSystem>(vault: &Vault<FS>) -> Result<Self> {
        let mut all = BTreeSet::new();
        for document in vault.list_markdown_documents()? {
            match tags_for(vault, &document) {
                Ok(tags) => all.extend(tags),
                Err(e) => log::warn!("Skipping tags of '{}': {}", document, e),
            }
        }
        log::debug!("Collected {} tags from vault", all.len());
        Ok(Self {
            tags: all.into_iter().collect(),
        })
    }

    /// The tags, sorted.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Consume into the sorted tag list.
    pub fn into_tags(self) -> Vec<String> {
        self.tags
    }
}

/// Tags of one document: frontmatter `tags` first, then inline `#tags`, in
/// order of appearance, without duplicates.
pub fn tags_for<FS: FileSystem>(vault: &Vault<FS>, document: &str) -> Result<Vec<String>> {
    let content = vault.read_text(document)?;
    let parsed = frontmatter::parse_or_empty(&content)?;

    let mut tags: Vec<String> = Vec::new();
    let frontmatter_tags = frontmatter::get_string_array(&parsed.frontmatter, TAGS_KEY)
        .into_iter()
        .map(|t| t.trim_start_matches('#').to_string());
    for tag in frontmatter_tags.chain(inline_tags(&parsed.body)) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Inline `#tag` occurrences in markdown body text.
///
/// A tag starts with `#` at the start of a word and runs over letters,
/// digits, `_`, `-` and `/`. Headings (`# Title`, `## Title`), purely numeric
/// tags (`#123`) and anything inside fenced code blocks are ignored.
pub fn inline_tags(body: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut in_fence = false;

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let mut prev: Option<char> = None;
        let mut chars = line.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            let at_word_start = prev.is_none_or(char::is_whitespace);
            prev = Some(c);
            if c != '#' || !at_word_start {
                continue;
            }
            let rest = &line[idx + 1..];
            let len: usize = rest
                .chars()
                .take_while(|ch| is_tag_char(*ch))
                .map(char::len_utf8)
                .sum();
            let tag = &rest[..len];
            if !tag.is_empty() && !tag.chars().all(|ch| ch.is_ascii_digit()) {
                tags.push(tag.to_string());
            }
            // Skip past the tag body
            while chars.peek().is_some_and(|(i, _)| *i <= idx + len) {
                if let Some((_, ch)) = chars.next() {
                    prev = Some(ch);
                }
            }
        }
    }
    tags
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '/'
}
