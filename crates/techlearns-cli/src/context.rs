//! Per-invocation wiring: API client, session store, and error reporting.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use techlearns_client::{ClientConfig, ClientError, TechLearnsClient};
use techlearns_core::SessionContext;
use techlearns_core::SessionStore;
use techlearns_core::status::{BannerKind, OperationStatus};

use crate::colors;

pub struct AppContext {
    pub client: TechLearnsClient,
    pub store: SessionStore,
}

impl AppContext {
    pub fn new(api_url: &str, session_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let store = match session_file {
            Some(path) => SessionStore::new(path),
            None => SessionStore::default_location()
                .context("no config directory available; pass --session-file")?,
        };
        let client = TechLearnsClient::new(ClientConfig::new(api_url))?;
        tracing::debug!("api: {}, session: {}", api_url, store.path().display());
        Ok(Self { client, store })
    }

    /// Session for this invocation, with expired tokens already cleared.
    pub fn session(&self) -> anyhow::Result<SessionContext> {
        self.store
            .restore(Utc::now())
            .map_err(|e| anyhow::anyhow!("{}", e.with_hint()))
    }
}

/// Convert a client error into the message shown to the learner.
pub fn user_error(err: ClientError) -> anyhow::Error {
    tracing::debug!("client error: {:?}", err);
    let mut message = err.user_message();
    if err.is_retryable() {
        message.push_str(" (run the same command again to retry)");
    }
    anyhow::anyhow!(message)
}

/// Print the operation's success banner, if one is showing.
fn print_banner(status: &OperationStatus) {
    let banner = status
        .banner(Instant::now())
        .filter(|b| b.kind == BannerKind::Success);
    if let Some(banner) = banner {
        println!("{}✓ {}{}", colors::GREEN, banner.message, colors::RESET);
    }
}

/// Drive one operation through its status lifecycle, printing the success
/// banner.
pub async fn tracked<T, F>(
    status: &mut OperationStatus,
    success: impl FnOnce(&T) -> String,
    work: F,
) -> anyhow::Result<T>
where
    F: Future<Output = Result<T, ClientError>>,
{
    status.begin()?;
    match work.await {
        Ok(value) => {
            status.succeed(success(&value), Instant::now());
            print_banner(status);
            Ok(value)
        }
        Err(err) => {
            // The error itself is reported by main.
            status.fail(err.user_message(), Instant::now());
            Err(user_error(err))
        }
    }
}
