//! Frontmatter building, merging and parsing.
//!
//! Note frontmatter is written by hand rather than through `serde_yaml` so the
//! output is byte-for-byte stable:
//!
//! ```text
//! ---
//! asset: "[[media/x.png]]"
//! tags: ["a", "b"]
//! ---
//! ```
//!
//! Parsing (for reading tags out of existing documents and templates) goes
//! through `serde_yaml` into an order-preserving map.

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::error::Result;

const DELIMITER: &str = "---";

/// Key of the image link property.
pub const ASSET_KEY: &str = "asset";

/// Key of the tag list property.
pub const TAGS_KEY: &str = "tags";

/// Result of parsing a markdown file with frontmatter.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// The parsed frontmatter as an ordered map.
    pub frontmatter: IndexMap<String, Value>,
    /// The body content after the frontmatter.
    pub body: String,
}

/// Build a note's frontmatter, optionally merged into a template.
///
/// Without a template the result is either `""` (nothing to record) or a
/// fresh block ending in `---\n`. With a template the whole template text is
/// returned: properties are spliced into its leading block when it has one,
/// otherwise a fresh block is prepended to the unchanged template.
pub fn build(tags: &[String], asset_link: Option<&str>, template_body: Option<&str>) -> String {
    match template_body {
        None => fresh_block(&property_lines(tags, asset_link)),
        Some(template) => merge_into_template(template, tags, asset_link),
    }
}

/// `asset: "[[<link>]]"`
pub fn asset_line(asset_link: &str) -> String {
    format!("{}: \"[[{}]]\"", ASSET_KEY, asset_link)
}

/// `tags: ["a", "b"]`, in the order given.
pub fn tags_line(tags: &[String]) -> String {
    let quoted: Vec<String> = tags.iter().map(|t| quote(t)).collect();
    format!("{}: [{}]", TAGS_KEY, quoted.join(", "))
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn property_lines(tags: &[String], asset_link: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(link) = asset_link {
        lines.push(asset_line(link));
    }
    if !tags.is_empty() {
        lines.push(tags_line(tags));
    }
    lines
}

fn fresh_block(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n{}\n{}\n", DELIMITER, lines.join("\n"), DELIMITER)
}

fn merge_into_template(template: &str, tags: &[String], asset_link: Option<&str>) -> String {
    if asset_link.is_none() && tags.is_empty() {
        return template.to_string();
    }

    let Some((inner, body)) = split_block(template) else {
        return format!("{}{}", fresh_block(&property_lines(tags, asset_link)), template);
    };

    // Tags already present in the template come first. A block that does not
    // parse keeps its own `tags` entry untouched.
    let mut merged_tags: Vec<String> = Vec::new();
    let mut replace_tags = !tags.is_empty();
    if replace_tags {
        match serde_yaml::from_str::<IndexMap<String, Value>>(inner) {
            Ok(existing) => merged_tags = get_string_array(&existing, TAGS_KEY),
            Err(e) => {
                log::warn!("Template frontmatter is not valid YAML: {}", e);
                replace_tags = !inner.lines().any(|line| is_key_line(line, TAGS_KEY));
            }
        }
    }
    if replace_tags {
        for tag in tags {
            if !merged_tags.contains(tag) {
                merged_tags.push(tag.clone());
            }
        }
    }

    let mut replaced: Vec<&str> = Vec::new();
    if asset_link.is_some() {
        replaced.push(ASSET_KEY);
    }
    if replace_tags {
        replaced.push(TAGS_KEY);
    }

    let mut lines: Vec<String> = without_keys(inner, &replaced)
        .into_iter()
        .map(String::from)
        .collect();
    lines.extend(property_lines(&merged_tags, asset_link));

    format!("{}\n{}\n{}\n{}", DELIMITER, lines.join("\n"), DELIMITER, body)
}

/// Drop top-level entries for `keys`, including their indented or `- `
/// continuation lines.
fn without_keys<'a>(inner: &'a str, keys: &[&str]) -> Vec<&'a str> {
    let mut kept = Vec::new();
    let mut skipping = false;
    for line in inner.lines() {
        let is_continuation = line.starts_with(' ') || line.starts_with('\t') || line.starts_with('-');
        if skipping && is_continuation {
            continue;
        }
        skipping = !is_continuation && keys.iter().any(|key| is_key_line(line, key));
        if !skipping {
            kept.push(line);
        }
    }
    kept
}

fn is_key_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

/// Split `content` into the text inside its leading `---` block and the body
/// after the closing delimiter line.
///
/// Returns `None` when there is no leading block or it is never closed.
pub fn split_block(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    // Empty block
    if let Some(body) = strip_delimiter_line(rest) {
        return Some(("", body));
    }

    for (idx, _) in rest.match_indices("\n---") {
        if let Some(body) = strip_delimiter_line(&rest[idx + 1..]) {
            let inner = rest[..idx].strip_suffix('\r').unwrap_or(&rest[..idx]);
            return Some((inner, body));
        }
    }
    None
}

fn strip_delimiter_line(text: &str) -> Option<&str> {
    let after = text.strip_prefix(DELIMITER)?;
    if after.is_empty() {
        Some("")
    } else if let Some(body) = after.strip_prefix('\n') {
        Some(body)
    } else {
        after.strip_prefix("\r\n")
    }
}

/// Parse frontmatter and body, returning empty frontmatter if none exists.
///
/// Malformed blocks (never closed) are treated as plain body text. Invalid
/// YAML inside a closed block is an error.
pub fn parse_or_empty(content: &str) -> Result<ParsedFile> {
    match split_block(content) {
        Some((inner, body)) => {
            let frontmatter: IndexMap<String, Value> = if inner.trim().is_empty() {
                IndexMap::new()
            } else {
                serde_yaml::from_str(inner)?
            };
            Ok(ParsedFile {
                frontmatter,
                body: body.to_string(),
            })
        }
        None => Ok(ParsedFile {
            frontmatter: IndexMap::new(),
            body: content.to_string(),
        }),
    }
}

/// Extract only the body from markdown content, stripping frontmatter.
///
/// If no frontmatter exists, returns the content unchanged.
pub fn extract_body(content: &str) -> &str {
    match split_block(content) {
        Some((_, body)) => body,
        None => content,
    }
}

/// Get an array property as a Vec of strings.
///
/// A single scalar counts as a one-element list. Numbers and booleans are
/// rendered as text; nested values are skipped.
pub fn get_string_array(frontmatter: &IndexMap<String, Value>, key: &str) -> Vec<String> {
    match frontmatter.get(key) {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
