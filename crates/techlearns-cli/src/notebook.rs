//! Notebook commands: languages, new, save, open.

use std::path::{Path, PathBuf};

use techlearns_client::SaveOutcome;
use techlearns_core::editor::EditorController;
use techlearns_core::language::LANGUAGES;
use techlearns_core::notebook::parse_tags;
use techlearns_core::status::{DismissPolicy, OperationStatus};
use techlearns_core::typing::TYPING_INTERVAL;
use techlearns_core::{Language, Notebook, NotebookId};

use crate::colors;
use crate::context::{AppContext, tracked};
use crate::local;

pub fn languages() {
    println!("{}Supported languages{}", colors::BOLD, colors::RESET);
    println!("{}", colors::rule());
    for option in LANGUAGES {
        let note = if option.language.is_markup() {
            " (previewed locally)"
        } else {
            ""
        };
        println!(
            "  {}{:<12}{} {:<12} .{}{}",
            colors::CYAN,
            option.language.as_str(),
            colors::RESET,
            option.label,
            option.language.extension(),
            note
        );
    }
}

/// Create a local notebook from a language template.
pub async fn create(
    path: &Path,
    language: Language,
    title: Option<String>,
    animate: bool,
) -> anyhow::Result<()> {
    let path = if path.extension().is_none() {
        path.with_extension(language.extension())
    } else {
        path.to_path_buf()
    };
    if path.exists() {
        anyhow::bail!("File {} already exists", path.display());
    }

    let mut editor = EditorController::new();
    if let Some(title) = title {
        editor.set_title(title);
    } else if let Some(stem) = path.file_stem() {
        editor.set_title(stem.to_string_lossy());
    }

    editor.select_language(language);
    if animate {
        let mut shown = 0;
        while editor.is_animating() {
            tokio::time::sleep(TYPING_INTERVAL).await;
            let content = editor.content();
            print!("{}", &content[shown..]);
            colors::flush_stdout();
            shown = content.len();
        }
        editor.finish_animation().await;
        print!("{}", &editor.content()[shown..]);
        println!();
    } else {
        editor.edit(language.template());
    }

    local::write(&path, &editor.snapshot())?;
    println!(
        "{}Created{} {} ({})",
        colors::GREEN,
        colors::RESET,
        path.display(),
        language.label()
    );
    Ok(())
}

/// Save a local notebook, creating it remotely on first save.
pub async fn save(
    ctx: &AppContext,
    file: &Path,
    title: Option<String>,
    is_public: Option<bool>,
    tags: Option<String>,
) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let mut editor = EditorController::from_notebook(local::load(file, None)?);
    if let Some(title) = title {
        editor.set_title(title);
    }
    if let Some(is_public) = is_public {
        editor.set_public(is_public);
    }
    if let Some(tags) = tags {
        editor.set_tags(parse_tags(&tags));
    }

    let notebooks = ctx.client.notebooks();
    let mut status = OperationStatus::new(DismissPolicy::Sticky);
    let outcome = tracked(
        &mut status,
        |outcome: &SaveOutcome| match outcome {
            SaveOutcome::Created(id) => format!("Notebook created ({id})"),
            SaveOutcome::Updated(id) => format!("Notebook saved ({id})"),
        },
        notebooks.save_editor(&session, &mut editor),
    )
    .await?;

    // Metadata only: the content on disk is already the saved value.
    local::write_meta(file, &editor.snapshot())?;
    tracing::debug!("sidecar updated with id {}", outcome.id());
    Ok(())
}

/// Download a notebook into a local file.
pub async fn open(ctx: &AppContext, id: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let id = NotebookId::new(id);

    let notebooks = ctx.client.notebooks();
    let mut status = OperationStatus::new(DismissPolicy::Sticky);
    let notebook = tracked(
        &mut status,
        |nb: &Notebook| format!("Loaded \"{}\"", nb.title),
        notebooks.load(&session, &id),
    )
    .await?;

    let editor = EditorController::from_notebook(notebook);
    let snapshot = editor.snapshot();
    let path = output.unwrap_or_else(|| local::file_name_for(&snapshot));
    if path.exists() {
        anyhow::bail!("File {} already exists", path.display());
    }
    local::write(&path, &snapshot)?;
    println!(
        "  {}◆{} {} ({}, {})",
        colors::CYAN,
        colors::RESET,
        path.display(),
        snapshot.language.label(),
        if snapshot.is_public { "public" } else { "private" }
    );
    Ok(())
}
