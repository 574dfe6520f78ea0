//! Local notebooks: a source file plus a JSON sidecar.
//!
//! ```text
//! sorting.py                  # content, edited in any editor
//! sorting.py.notebook.json    # id, title, language, visibility, tags
//! ```
//!
//! The sidecar is what ties a file to its saved notebook: once a save
//! creates the notebook, the returned id is written here so later saves
//! update it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use techlearns_core::notebook::DEFAULT_TITLE;
use techlearns_core::{Language, Notebook, NotebookId};

const SIDECAR_SUFFIX: &str = ".notebook.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NotebookId>,
    pub title: String,
    pub language: Language,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NotebookMeta {
    fn from_notebook(notebook: &Notebook) -> Self {
        Self {
            id: notebook.id.clone(),
            title: notebook.title.clone(),
            language: notebook.language,
            is_public: notebook.is_public,
            tags: notebook.tags.clone(),
        }
    }
}

pub fn sidecar_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Language for `source`: explicit override, then sidecar, then extension.
fn infer_language(
    source: &Path,
    meta: Option<&NotebookMeta>,
    explicit: Option<Language>,
) -> anyhow::Result<Language> {
    if let Some(language) = explicit.or(meta.map(|m| m.language)) {
        return Ok(language);
    }
    source
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Language::from_extension)
        .with_context(|| {
            format!(
                "cannot tell the language of {}; pass --language",
                source.display()
            )
        })
}

fn read_meta(source: &Path) -> anyhow::Result<Option<NotebookMeta>> {
    let path = sidecar_path(source);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)?;
    let meta = serde_json::from_str(&raw)
        .with_context(|| format!("invalid notebook metadata in {}", path.display()))?;
    Ok(Some(meta))
}

/// Read a local notebook. The file content is always the live value.
pub fn load(source: &Path, language: Option<Language>) -> anyhow::Result<Notebook> {
    let content = fs::read_to_string(source)
        .with_context(|| format!("Notebook not found: {}", source.display()))?;
    let meta = read_meta(source)?;
    let language = infer_language(source, meta.as_ref(), language)?;

    Ok(match meta {
        Some(meta) => Notebook {
            id: meta.id,
            title: meta.title,
            content,
            language,
            is_public: meta.is_public,
            tags: meta.tags,
        },
        None => Notebook {
            id: None,
            title: source
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content,
            language,
            is_public: false,
            tags: Vec::new(),
        },
    })
}

/// Write the sidecar for `source`.
pub fn write_meta(source: &Path, notebook: &Notebook) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&NotebookMeta::from_notebook(notebook))?;
    fs::write(sidecar_path(source), json)?;
    Ok(())
}

/// Write content and sidecar.
pub fn write(source: &Path, notebook: &Notebook) -> anyhow::Result<()> {
    fs::write(source, &notebook.content)?;
    write_meta(source, notebook)
}

/// File name derived from a notebook title.
pub fn file_name_for(notebook: &Notebook) -> PathBuf {
    let stem: String = notebook
        .title
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "notebook" } else { stem };
    PathBuf::from(format!("{}.{}", stem, notebook.language.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("dir/sort.py")),
            PathBuf::from("dir/sort.py.notebook.json")
        );
    }

    #[test]
    fn test_load_without_sidecar_infers_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bubble_sort.py");
        fs::write(&path, "print(1)").unwrap();

        let nb = load(&path, None).unwrap();
        assert_eq!(nb.language, Language::Python);
        assert_eq!(nb.title, "bubble_sort");
        assert!(nb.id.is_none());
    }

    #[test]
    fn test_sidecar_roundtrip_keeps_id() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.txt");
        let nb = Notebook {
            id: Some(NotebookId::new("nb-7")),
            title: "Landing".into(),
            content: "<p>hi</p>".into(),
            language: Language::Html,
            is_public: true,
            tags: vec!["web".into()],
        };
        write(&path, &nb).unwrap();

        assert_eq!(load(&path, None).unwrap(), nb);
    }

    #[test]
    fn test_unknown_extension_needs_language() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("script.rb");
        fs::write(&path, "puts 1").unwrap();

        assert!(load(&path, None).is_err());
        assert_eq!(load(&path, Some(Language::Python)).unwrap().language, Language::Python);
    }

    #[test]
    fn test_file_name_for_title() {
        let nb = Notebook {
            title: "My First Loop!".into(),
            language: Language::Java,
            ..Default::default()
        };
        assert_eq!(file_name_for(&nb), PathBuf::from("my_first_loop.java"));
    }
}
