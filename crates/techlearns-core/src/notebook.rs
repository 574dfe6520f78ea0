//! Notebook document and its save payload.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Title given to notebooks the user has not named.
pub const DEFAULT_TITLE: &str = "Untitled Notebook";

/// Server-assigned notebook identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotebookId(String);

impl NotebookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotebookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved unit of source code, language tag, and metadata.
///
/// `id` stays `None` until the first save; afterwards every save is an
/// update of that id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NotebookId>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for Notebook {
    fn default() -> Self {
        Self {
            id: None,
            title: default_title(),
            content: String::new(),
            language: Language::default(),
            is_public: false,
            tags: Vec::new(),
        }
    }
}

impl Notebook {
    /// Body sent on create and update.
    pub fn payload(&self) -> NotebookPayload<'_> {
        NotebookPayload {
            title: &self.title,
            content: &self.content,
            language: self.language,
            is_public: self.is_public,
            tags: &self.tags,
        }
    }

    /// Whether this document has been saved at least once.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// Wire body for `POST /api/notebooks` and `PUT /api/notebooks/:id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookPayload<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub language: Language,
    pub is_public: bool,
    pub tags: &'a [String],
}

/// Parse a comma-separated tag field.
///
/// Tags are trimmed, empty entries dropped, and duplicates removed keeping
/// the first occurrence so the user's order is preserved.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
