//! Run command implementation.
//!
//! Sends a local notebook to the execution service and prints the result.
//! HTML is rendered locally instead, optionally in the sandboxed preview.

use std::path::Path;
use std::time::Instant;

use techlearns_client::ExecutionOutput;
use techlearns_core::Language;
use techlearns_core::status::{DismissPolicy, OperationStatus};
use techlearns_preview::PreviewConfig;

use crate::colors;
use crate::context::{AppContext, tracked};
use crate::local;

/// Execute a notebook file once.
pub async fn execute(
    ctx: &AppContext,
    file: &Path,
    language: Option<Language>,
    stdin: &str,
    preview_port: Option<u16>,
) -> anyhow::Result<()> {
    let notebook = local::load(file, language)?;
    let session = ctx.session()?;
    let start = Instant::now();

    print_header(&notebook.title, notebook.language);

    let execution = ctx.client.execution();
    let mut status = OperationStatus::new(DismissPolicy::Transient);
    let output = tracked(
        &mut status,
        |_| "Code executed successfully".to_string(),
        execution.run(&session, notebook.language, &notebook.content, stdin),
    )
    .await?;

    print_output(&output);
    println!("{}", colors::rule());
    println!(
        "{}Completed{} in {:.2}s",
        colors::GREEN,
        colors::RESET,
        start.elapsed().as_secs_f64()
    );

    if let (ExecutionOutput::Html(html), Some(port)) = (&output, preview_port) {
        let config = PreviewConfig {
            port,
            ..PreviewConfig::default()
        };
        println!(
            "{}  ◆ Preview:{} http://{}:{} (Ctrl+C to stop)",
            colors::CYAN,
            colors::RESET,
            config.host,
            config.port
        );
        techlearns_preview::serve_markup(notebook.title.clone(), html.clone(), config).await?;
    }

    Ok(())
}

pub fn print_header(title: &str, language: Language) {
    println!(
        "\n{}{}{} - {}{}{}",
        colors::BOLD,
        title,
        colors::RESET,
        colors::CYAN,
        language.label(),
        colors::RESET
    );
    println!("{}", colors::rule());
}

pub fn print_output(output: &ExecutionOutput) {
    match output {
        ExecutionOutput::Text(text) => {
            println!("{}Output:{}", colors::BOLD, colors::RESET);
            println!("{}", text.trim_end());
        }
        ExecutionOutput::Html(html) => {
            println!(
                "{}HTML preview{} {}(rendered locally; use --preview to open it sandboxed){}",
                colors::BOLD,
                colors::RESET,
                colors::DIM,
                colors::RESET
            );
            println!("{}", html.trim_end());
        }
    }
}
