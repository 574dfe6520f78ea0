//! TechLearns API client.
//!
//! Typed access to the platform's REST endpoints:
//!
//! - **Execution**: `POST /api/execute`, with local markup preview
//! - **Notebooks**: load, create, and update saved notebooks
//! - **Auth**: role-specific login and registration
//! - **Dashboard**: competitions and mock-test results
//!
//! Every call takes the [`SessionContext`] explicitly; operations that need a
//! token fail with [`ClientError::AuthenticationRequired`] before touching
//! the network when none is present.

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod execute;
pub mod notebooks;
pub mod runner;

pub use api::ApiClient;
pub use auth::{AuthClient, RegisterOutcome};
pub use config::ClientConfig;
pub use dashboard::DashboardClient;
pub use error::{ClientError, ClientResult};
pub use execute::{ExecutionClient, ExecutionOutput};
pub use notebooks::{NotebookClient, SaveOutcome};
pub use runner::{RunCoordinator, RunOutcome};

use techlearns_core::SessionContext;

/// Entry point bundling every endpoint group over one connection pool.
#[derive(Debug, Clone)]
pub struct TechLearnsClient {
    api: ApiClient,
}

impl TechLearnsClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub fn execution(&self) -> ExecutionClient {
        ExecutionClient::new(self.api.clone())
    }

    pub fn notebooks(&self) -> NotebookClient {
        NotebookClient::new(self.api.clone())
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    pub fn dashboard(&self) -> DashboardClient {
        DashboardClient::new(self.api.clone())
    }
}

/// Token of the current session, or the error every guarded call returns.
pub(crate) fn require_token(session: &SessionContext) -> ClientResult<&str> {
    session.token().ok_or(ClientError::AuthenticationRequired)
}
