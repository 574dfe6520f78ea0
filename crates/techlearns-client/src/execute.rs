//! Code execution client.
//!
//! Sends the editor's source and stdin to the remote execution service.
//! Markup never leaves the machine: its source is the output, and isolation
//! is left to whatever renders it.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use techlearns_core::{Language, SessionContext};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::require_token;

pub const EXECUTE_PATH: &str = "/api/execute";

/// Shown when a run succeeds without printing anything.
pub const NO_OUTPUT: &str = "No output";

#[derive(Debug, Serialize)]
struct ExecutionRequest<'a> {
    language: Language,
    code: &'a str,
    stdin: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecutionResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutput {
    /// Captured program output.
    Text(String),
    /// Markup to render in an isolated preview.
    Html(String),
}

impl ExecutionOutput {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Html(s) => s,
        }
    }
}

/// Client for `POST /api/execute`.
#[derive(Debug, Clone)]
pub struct ExecutionClient {
    api: ApiClient,
}

impl ExecutionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Run `code` with `stdin`.
    ///
    /// Fails with [`ClientError::AuthenticationRequired`] before any network
    /// activity when the context has no token.
    pub async fn run(
        &self,
        session: &SessionContext,
        language: Language,
        code: &str,
        stdin: &str,
    ) -> ClientResult<ExecutionOutput> {
        let token = require_token(session)?;

        if language.is_markup() {
            tracing::debug!("rendering {} bytes of markup locally", code.len());
            return Ok(ExecutionOutput::Html(code.to_string()));
        }

        tracing::debug!("executing {} ({} bytes)", language, code.len());
        let request = self
            .api
            .request(Method::POST, EXECUTE_PATH, Some(token))
            .timeout(self.api.config().execute_timeout)
            .json(&ExecutionRequest {
                language,
                code,
                stdin,
            });

        let response: ExecutionResponse = self.api.send_json(request).await?;
        if let Some(error) = response.error {
            return Err(ClientError::Service(error));
        }

        Ok(ExecutionOutput::Text(
            response
                .output
                .filter(|output| !output.is_empty())
                .unwrap_or_else(|| NO_OUTPUT.to_string()),
        ))
    }
}
