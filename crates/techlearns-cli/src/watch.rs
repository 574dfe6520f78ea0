//! Watch command implementation.
//!
//! Re-runs a notebook on every change. A change that lands while a run is
//! still pending replaces that run instead of queueing behind it.

use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use techlearns_client::{ClientError, ExecutionClient, ExecutionOutput, RunCoordinator, RunOutcome};
use techlearns_core::{Language, SessionContext};
use techlearns_preview::{FileEvent, FileWatcher};

use crate::colors;
use crate::context::AppContext;
use crate::local;
use crate::run::{print_header, print_output};

/// Execute the watch command.
pub async fn execute(
    ctx: &AppContext,
    file: &Path,
    language: Option<Language>,
    stdin: String,
    clear_screen: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("Notebook not found: {}", file.display());
    }
    let session = ctx.session()?;
    if !session.is_authenticated() {
        return Err(crate::context::user_error(ClientError::AuthenticationRequired));
    }

    let abs_path = file.canonicalize()?;
    let coordinator = Arc::new(RunCoordinator::new());
    let execution = ctx.client.execution();
    let stdin: Arc<str> = stdin.into();

    println!(
        "{}Watching {} for changes... (Ctrl+C to stop){}",
        colors::DIM,
        file.display(),
        colors::RESET
    );

    let mut watcher = FileWatcher::new(&abs_path)?;
    spawn_run(
        &coordinator,
        &execution,
        &session,
        &abs_path,
        language,
        &stdin,
        clear_screen,
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while let Some(event) = next_event(&mut watcher, shutdown.as_mut()).await {
        match event {
            FileEvent::Modified(_) => spawn_run(
                &coordinator,
                &execution,
                &session,
                &abs_path,
                language,
                &stdin,
                clear_screen,
            ),
            FileEvent::Removed(path) => {
                eprintln!(
                    "\n{}Warning:{} Notebook file removed: {}",
                    colors::YELLOW,
                    colors::RESET,
                    path.display()
                );
            }
        }
    }

    // Drop any run still in flight so it never prints after shutdown.
    coordinator.cancel();
    Ok(())
}

/// Next change to the notebook, or `None` once `shutdown` fires.
async fn next_event<S: Future>(
    watcher: &mut FileWatcher,
    shutdown: Pin<&mut S>,
) -> Option<FileEvent> {
    tokio::select! {
        event = watcher.recv() => event,
        _ = shutdown => {
            println!("\n{}Stopped watching{}", colors::DIM, colors::RESET);
            None
        }
    }
}

/// Start a run on its own task, superseding any run still in flight.
fn spawn_run(
    coordinator: &Arc<RunCoordinator>,
    execution: &ExecutionClient,
    session: &SessionContext,
    path: &Path,
    language: Option<Language>,
    stdin: &Arc<str>,
    clear_screen: bool,
) {
    let notebook = match local::load(path, language) {
        Ok(notebook) => notebook,
        Err(e) => {
            eprintln!("{}Error:{} {}", colors::RED, colors::RESET, e);
            return;
        }
    };

    let coordinator = coordinator.clone();
    let execution = execution.clone();
    let session = session.clone();
    let stdin = stdin.clone();

    tokio::spawn(async move {
        let work = async move {
            execution
                .run(&session, notebook.language, &notebook.content, &stdin)
                .await
                .map(|output| (notebook, output))
        };

        match coordinator.run(work).await {
            RunOutcome::Completed(Ok((notebook, output))) => {
                if clear_screen {
                    clear_terminal();
                }
                print_header(&notebook.title, notebook.language);
                print_output(&output);
                if let ExecutionOutput::Html(_) = output {
                    println!(
                        "{}Tip:{} `techlearns preview` reloads HTML automatically",
                        colors::DIM,
                        colors::RESET
                    );
                }
                println!(
                    "\n{}Watching for changes... (Ctrl+C to stop){}",
                    colors::DIM,
                    colors::RESET
                );
            }
            RunOutcome::Completed(Err(err)) => {
                eprintln!("{}Error:{} {}", colors::RED, colors::RESET, err.user_message());
            }
            RunOutcome::Superseded => {
                tracing::debug!("run superseded by a newer change");
            }
        }
    });
}

/// Clear the terminal screen.
fn clear_terminal() {
    print!("\x1B[2J\x1B[1;1H");
    colors::flush_stdout();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn watched_file(temp: &TempDir) -> (std::path::PathBuf, FileWatcher) {
        let path = temp.path().join("loop.py");
        fs::write(&path, "print(1)").unwrap();
        let path = path.canonicalize().unwrap();
        let watcher = FileWatcher::new(&path).unwrap();
        (path, watcher)
    }

    #[tokio::test]
    async fn test_shutdown_ends_the_watch_loop() {
        let temp = TempDir::new().unwrap();
        let (_, mut watcher) = watched_file(&temp);

        let shutdown = std::future::ready(());
        tokio::pin!(shutdown);
        let event = next_event(&mut watcher, shutdown);
        let event = tokio::time::timeout(Duration::from_secs(5), event)
            .await
            .expect("shutdown was not observed");
        assert_eq!(event, None);
    }

    #[tokio::test]
    async fn test_changes_pass_through_until_shutdown() {
        let temp = TempDir::new().unwrap();
        let (path, mut watcher) = watched_file(&temp);
        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(&path, "print(2)").unwrap();

        let shutdown = std::future::pending::<()>();
        tokio::pin!(shutdown);
        let event = next_event(&mut watcher, shutdown);
        let event = tokio::time::timeout(Duration::from_secs(5), event)
            .await
            .expect("no file event within 5s");
        assert_eq!(event, Some(FileEvent::Modified(path)));
    }
}
