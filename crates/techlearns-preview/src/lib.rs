//! TechLearns HTML preview server.
//!
//! Renders HTML notebook output locally, isolated in a sandboxed frame.
//!
//! # Architecture
//!
//! - **Routes**: host page, sandboxed frame, revision polling, health
//! - **Watcher**: picks up edits to the source file and swaps the markup

pub mod error;
pub mod routes;
pub mod watcher;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

pub use error::{PreviewError, PreviewResult};
pub use routes::{AppState, PreviewDocument, create_router};
pub use watcher::{FileEvent, FileWatcher};

/// Preview server configuration.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4173,
        }
    }
}

impl PreviewConfig {
    fn addr(&self) -> PreviewResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| PreviewError::Address(format!("{}:{}", self.host, self.port)))
    }
}

/// Preview a file, reloading it whenever it changes on disk.
pub async fn serve_file(path: impl AsRef<Path>, config: PreviewConfig) -> PreviewResult<()> {
    let path = path.as_ref();
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PreviewError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let document = Arc::new(RwLock::new(PreviewDocument::new(title, html)));

    let mut watcher = FileWatcher::new(path)?;
    let watched = document.clone();
    let watcher_task = tokio::spawn(async move {
        while let Some(event) = watcher.recv().await {
            match event {
                FileEvent::Modified(path) => match tokio::fs::read_to_string(&path).await {
                    Ok(html) => {
                        watched.write().await.replace(html);
                        tracing::info!("reloaded {}", path.display());
                    }
                    Err(e) => tracing::warn!("could not read {}: {}", path.display(), e),
                },
                FileEvent::Removed(path) => {
                    tracing::warn!("previewed file removed: {}", path.display());
                }
            }
        }
    });

    let result = serve_document(document, config).await;

    watcher_task.abort();
    let _ = watcher_task.await;

    result
}

/// Preview fixed markup until Ctrl+C.
pub async fn serve_markup(
    title: impl Into<String>,
    html: impl Into<String>,
    config: PreviewConfig,
) -> PreviewResult<()> {
    let document = Arc::new(RwLock::new(PreviewDocument::new(title, html)));
    serve_document(document, config).await
}

async fn serve_document(
    document: Arc<RwLock<PreviewDocument>>,
    config: PreviewConfig,
) -> PreviewResult<()> {
    let state = Arc::new(AppState { document });
    let app = create_router(state);

    let addr = config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Preview available at http://{}", addr);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    tracing::info!("Preview server stopped");
    Ok(())
}
