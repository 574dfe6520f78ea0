//! Preview command implementation.

use std::path::Path;

use techlearns_preview::PreviewConfig;

use crate::colors;

/// Serve an HTML file in the sandboxed preview until Ctrl+C.
pub async fn execute(file: &Path, port: u16) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let config = PreviewConfig {
        port,
        ..PreviewConfig::default()
    };

    println!("\n{}TechLearns Preview{}", colors::BOLD, colors::RESET);
    println!("{}", colors::rule());
    println!("{}  ◆ File:{} {}", colors::CYAN, colors::RESET, file.display());
    println!(
        "{}  ◆ Server:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!("{}", colors::rule());
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    techlearns_preview::serve_file(file, config).await?;
    Ok(())
}
