//! Notebook persistence client.
//!
//! A notebook without an id is created; the returned id is adopted so every
//! later save updates the same document instead of creating another.

use reqwest::Method;
use serde::Deserialize;
use techlearns_core::editor::EditorController;
use techlearns_core::{Notebook, NotebookId, SessionContext};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::require_token;

pub const NOTEBOOKS_PATH: &str = "/api/notebooks";

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new document was created with this id.
    Created(NotebookId),
    /// The existing document was updated.
    Updated(NotebookId),
}

impl SaveOutcome {
    pub fn id(&self) -> &NotebookId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Some deployments wrap the document as `{ "notebook": {...} }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NotebookEnvelope {
    Wrapped { notebook: Notebook },
    Bare(Notebook),
}

impl NotebookEnvelope {
    fn into_inner(self) -> Notebook {
        match self {
            Self::Wrapped { notebook } | Self::Bare(notebook) => notebook,
        }
    }
}

fn notebook_path(id: &NotebookId) -> String {
    format!("{}/{}", NOTEBOOKS_PATH, id)
}

/// Client for `/api/notebooks`.
#[derive(Debug, Clone)]
pub struct NotebookClient {
    api: ApiClient,
}

impl NotebookClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch a notebook. 404 and transport failures are retryable.
    pub async fn load(&self, session: &SessionContext, id: &NotebookId) -> ClientResult<Notebook> {
        let token = require_token(session)?;
        let request = self.api.request(Method::GET, &notebook_path(id), Some(token));
        let envelope: NotebookEnvelope = self.api.send_json(request).await?;
        Ok(envelope.into_inner())
    }

    /// Create a notebook, returning the stored document with its id.
    pub async fn create(
        &self,
        session: &SessionContext,
        notebook: &Notebook,
    ) -> ClientResult<Notebook> {
        let token = require_token(session)?;
        let request = self
            .api
            .request(Method::POST, NOTEBOOKS_PATH, Some(token))
            .json(&notebook.payload());
        let envelope: NotebookEnvelope = self.api.send_json(request).await?;
        Ok(envelope.into_inner())
    }

    /// Overwrite the notebook stored under `id`.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: &NotebookId,
        notebook: &Notebook,
    ) -> ClientResult<Notebook> {
        let token = require_token(session)?;
        let request = self
            .api
            .request(Method::PUT, &notebook_path(id), Some(token))
            .json(&notebook.payload());
        let envelope: NotebookEnvelope = self.api.send_json(request).await?;
        Ok(envelope.into_inner())
    }

    /// Create or update depending on whether `notebook` has an id.
    ///
    /// On create the returned id is written into `notebook`.
    pub async fn save(
        &self,
        session: &SessionContext,
        notebook: &mut Notebook,
    ) -> ClientResult<SaveOutcome> {
        match notebook.id.clone() {
            Some(id) => {
                self.update(session, &id, notebook).await?;
                tracing::info!("updated notebook {}", id);
                Ok(SaveOutcome::Updated(id))
            }
            None => {
                let created = self.create(session, notebook).await?;
                let id = created
                    .id
                    .ok_or_else(|| ClientError::Decode("created notebook has no id".to_string()))?;
                notebook.id = Some(id.clone());
                tracing::info!("created notebook {}", id);
                Ok(SaveOutcome::Created(id))
            }
        }
    }

    /// Save the editor's live value and adopt the id on create.
    pub async fn save_editor(
        &self,
        session: &SessionContext,
        editor: &mut EditorController,
    ) -> ClientResult<SaveOutcome> {
        let mut notebook = editor.snapshot();
        let outcome = self.save(session, &mut notebook).await?;
        if let SaveOutcome::Created(id) = &outcome {
            editor.adopt_id(id.clone());
        }
        Ok(outcome)
    }
}
