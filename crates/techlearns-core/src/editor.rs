//! Editor state controller.
//!
//! Owns the live notebook fields and mediates between the text surface, the
//! typing animation, and save. State sits behind a shared mutex so the
//! animation task can write into it; every write from the animation is tagged
//! with an epoch that user edits and reloads bump, which keeps a stale
//! animation from touching content after it has been superseded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::language::Language;
use crate::notebook::{DEFAULT_TITLE, Notebook, NotebookId};
use crate::typing::TypingAnimation;

/// Content shown in a fresh editor before any language is picked.
pub const PLACEHOLDER: &str = "// Select a language and start coding...\n";

#[derive(Debug)]
struct EditorState {
    id: Option<NotebookId>,
    title: String,
    content: String,
    language: Language,
    is_public: bool,
    tags: Vec<String>,
    /// Set once the content holds something the user would lose.
    touched: bool,
    /// Bumped whenever content ownership changes hands.
    epoch: u64,
}

fn lock(state: &Mutex<EditorState>) -> MutexGuard<'_, EditorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live notebook editor.
pub struct EditorController {
    state: Arc<Mutex<EditorState>>,
    animation: TypingAnimation,
}

impl EditorController {
    /// Fresh editor holding the placeholder.
    pub fn new() -> Self {
        Self::with_animation(TypingAnimation::new())
    }

    /// Fresh editor with a custom animation driver.
    pub fn with_animation(animation: TypingAnimation) -> Self {
        Self {
            state: Arc::new(Mutex::new(EditorState {
                id: None,
                title: DEFAULT_TITLE.to_string(),
                content: PLACEHOLDER.to_string(),
                language: Language::default(),
                is_public: false,
                tags: Vec::new(),
                touched: false,
                epoch: 0,
            })),
            animation,
        }
    }

    /// Editor populated from a stored document.
    pub fn from_notebook(notebook: Notebook) -> Self {
        let mut editor = Self::new();
        editor.load(notebook);
        editor
    }

    /// Replace every field with a loaded document.
    pub fn load(&mut self, notebook: Notebook) {
        self.animation.cancel();
        let mut state = lock(&self.state);
        state.epoch += 1;
        state.id = notebook.id;
        state.title = notebook.title;
        state.content = notebook.content;
        state.language = notebook.language;
        state.is_public = notebook.is_public;
        state.tags = notebook.tags;
        state.touched = true;
    }

    /// Switch language.
    ///
    /// Returns `true` when the content was still pristine and the language's
    /// template is now being typed in. Edited content is never replaced.
    /// Without a tokio runtime the template is written in one step.
    pub fn select_language(&mut self, language: Language) -> bool {
        let epoch = {
            let mut state = lock(&self.state);
            state.language = language;
            if state.touched {
                return false;
            }
            state.epoch += 1;
            state.epoch
        };

        let shared = Arc::clone(&self.state);
        self.animation.start(language.template(), move |prefix| {
            let mut state = lock(&shared);
            if state.epoch != epoch {
                return false;
            }
            state.content.clear();
            state.content.push_str(prefix);
            true
        });
        true
    }

    /// Apply a user edit, stopping any animation in flight.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.animation.cancel();
        let mut state = lock(&self.state);
        state.epoch += 1;
        state.content = content.into();
        state.touched = true;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        lock(&self.state).title = title.into();
    }

    pub fn set_public(&mut self, is_public: bool) {
        lock(&self.state).is_public = is_public;
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        lock(&self.state).tags = tags;
    }

    /// Record the identifier assigned by the first save.
    pub fn adopt_id(&mut self, id: NotebookId) {
        lock(&self.state).id = Some(id);
    }

    pub fn id(&self) -> Option<NotebookId> {
        lock(&self.state).id.clone()
    }

    pub fn content(&self) -> String {
        lock(&self.state).content.clone()
    }

    pub fn language(&self) -> Language {
        lock(&self.state).language
    }

    pub fn title(&self) -> String {
        lock(&self.state).title.clone()
    }

    /// Whether the content is still something the user never wrote.
    pub fn is_pristine(&self) -> bool {
        !lock(&self.state).touched
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    /// Wait for the current typing animation to complete.
    pub async fn finish_animation(&mut self) {
        self.animation.finish().await;
    }

    /// Document built from the live editor value.
    pub fn snapshot(&self) -> Notebook {
        let state = lock(&self.state);
        Notebook {
            id: state.id.clone(),
            title: state.title.clone(),
            content: state.content.clone(),
            language: state.language,
            is_public: state.is_public,
            tags: state.tags.clone(),
        }
    }
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}
