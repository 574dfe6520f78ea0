//! HTTP routes for the preview server.
//!
//! The host page embeds the markup through an `<iframe sandbox>`, and the
//! frame response itself carries a CSP `sandbox` directive so the markup
//! stays isolated even when opened directly.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, header},
    response::{Html, IntoResponse, Json},
    routing::get,
};
use tokio::sync::RwLock;
use tower_http::set_header::SetResponseHeaderLayer;

/// Sandbox applied to previewed markup: scripts run, but in an opaque
/// origin with no access to the host page, forms, popups, or navigation.
pub const SANDBOX_POLICY: &str = "allow-scripts";

/// Markup currently being previewed.
#[derive(Debug, Clone, Default)]
pub struct PreviewDocument {
    /// Label shown in the host page header.
    pub title: String,
    /// Markup rendered inside the frame.
    pub html: String,
    /// Incremented on every replacement so the host page can reload.
    pub revision: u64,
}

impl PreviewDocument {
    pub fn new(title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html: html.into(),
            revision: 0,
        }
    }

    /// Swap in new markup and bump the revision.
    pub fn replace(&mut self, html: impl Into<String>) {
        self.html = html.into();
        self.revision += 1;
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub document: Arc<RwLock<PreviewDocument>>,
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let csp = HeaderValue::from_str(&format!("sandbox {SANDBOX_POLICY}"))
        .unwrap_or_else(|_| HeaderValue::from_static("sandbox"));

    Router::new()
        .route("/", get(host_handler))
        .route(
            "/frame",
            get(frame_handler)
                .layer::<_, std::convert::Infallible>(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    csp,
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .route("/revision", get(revision_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Escape text for an HTML text node or attribute.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Host page wrapping the sandboxed frame.
async fn host_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let document = state.document.read().await;
    let title = escape_html(&document.title);
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} - TechLearns Preview</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; }}
        header {{ padding: 0.75rem 1rem; background: #1e1b4b; color: #fff; }}
        iframe {{ border: 0; width: 100%; height: calc(100vh - 3rem); background: #fff; }}
    </style>
</head>
<body>
    <header>{title}</header>
    <iframe id="preview" sandbox="{sandbox}" src="/frame"></iframe>
    <script>
        let revision = {revision};
        setInterval(async () => {{
            const res = await fetch('/revision');
            const body = await res.json();
            if (body.revision !== revision) {{
                revision = body.revision;
                document.getElementById('preview').src = '/frame?r=' + revision;
            }}
        }}, 1000);
    </script>
</body>
</html>"#,
        sandbox = SANDBOX_POLICY,
        revision = document.revision,
    ))
}

/// Previewed markup, served as-is.
async fn frame_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(state.document.read().await.html.clone())
}

async fn revision_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let revision = state.document.read().await.revision;
    Json(serde_json::json!({ "revision": revision }))
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_replace_bumps_revision() {
        let mut doc = PreviewDocument::new("page.html", "<p>a</p>");
        doc.replace("<p>b</p>");
        assert_eq!(doc.revision, 1);
        assert_eq!(doc.html, "<p>b</p>");
    }
}
