//! Note templates.
//!
//! The configured template is a note in the vault. Before frontmatter is
//! merged into it, simple `{{variable}}` placeholders are substituted.
//! Date and time accept a format specifier: `{{date:%d %B %Y}}`.

use chrono::{Local, NaiveDateTime};
use std::fmt::Write;

use crate::error::{Result, SnapnoteError};
use crate::fs::FileSystem;
use crate::store::Vault;

/// A template loaded from the vault
#[derive(Debug, Clone)]
pub struct Template {
    /// Vault path the template was read from
    pub path: String,
    /// Raw template content (before variable substitution)
    pub raw_content: String,
}

impl Template {
    /// Create a new template from raw content
    pub fn new(path: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw_content: raw_content.into(),
        }
    }

    /// Load the template configured as `template_file`.
    ///
    /// `.md` is appended when the setting has no extension. Any failure is
    /// reported as [`SnapnoteError::TemplateRead`].
    pub fn load<FS: FileSystem>(vault: &Vault<FS>, template_file: &str) -> Result<Self> {
        let path = template_path(template_file);
        let content = vault
            .read_text(&path)
            .map_err(|e| SnapnoteError::TemplateRead {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(path, content))
    }

    /// Render the template with the given context
    pub fn render(&self, context: &TemplateContext) -> String {
        substitute_variables(&self.raw_content, context)
    }
}

/// Vault path of a configured template.
pub fn template_path(template_file: &str) -> String {
    let trimmed = template_file.trim().trim_start_matches('/');
    if trimmed.ends_with(".md") {
        trimmed.to_string()
    } else {
        format!("{}.md", trimmed)
    }
}

/// Context for template variable substitution
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Title of the note
    pub title: Option<String>,
    /// Moment to render (defaults to now)
    pub now: Option<NaiveDateTime>,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pin the date and time
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    fn effective_now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

/// Substitute template variables in a string
fn substitute_variables(content: &str, context: &TemplateContext) -> String {
    let now = context.effective_now();

    // Process variables with format specifiers first (e.g., {{date:%Y-%m-%d}})
    let mut result = substitute_formatted_variables(content, "date", |fmt| format_moment(&now, fmt));
    result = substitute_formatted_variables(&result, "time", |fmt| format_moment(&now, fmt));

    let replacements: [(&str, String); 3] = [
        ("title", context.title.clone().unwrap_or_default()),
        ("date", now.format("%Y-%m-%d").to_string()),
        ("time", now.format("%H:%M").to_string()),
    ];

    for (var, value) in replacements {
        let pattern = format!("{{{{{}}}}}", var);
        result = result.replace(&pattern, &value);
    }

    result
}

/// Format with a user-supplied strftime string; `None` if it is invalid.
fn format_moment(now: &NaiveDateTime, fmt: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", now.format(fmt)).ok()?;
    Some(out)
}

/// Substitute variables with format specifiers like {{var:FORMAT}}
///
/// Placeholders whose format cannot be rendered are left as written.
fn substitute_formatted_variables<F>(content: &str, var_name: &str, formatter: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("{{{{{}:", var_name);
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(&prefix) {
        let after = &rest[start + prefix.len()..];
        let Some(end) = after.find("}}") else {
            break;
        };
        result.push_str(&rest[..start]);
        match formatter(&after[..end]) {
            Some(replacement) => result.push_str(&replacement),
            None => result.push_str(&rest[start..start + prefix.len() + end + 2]),
        }
        rest = &after[end + 2..];
    }

    result.push_str(rest);
    result
}
