//! TechLearns CLI - learner front end for notebooks, auth, and dashboards.

mod auth;
mod colors;
mod context;
mod dashboard;
mod local;
mod notebook;
mod preview;
mod run;
mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use techlearns_client::config::DEFAULT_API_URL;
use techlearns_core::{Language, UserType};

use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "techlearns")]
#[command(about = "TechLearns Academy notebooks from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the TechLearns API
    #[arg(long, global = true, env = "TECHLEARNS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Where the login session is stored
    #[arg(long, global = true, env = "TECHLEARNS_SESSION")]
    session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TECHLEARNS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account type: user, mentor, or school
        #[arg(long, default_value = "user")]
        role: UserType,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,

        #[arg(long)]
        phone: Option<String>,

        /// Account type: user, mentor, or school
        #[arg(long, default_value = "user")]
        role: UserType,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in account
    Whoami,

    /// List supported languages
    Languages,

    /// Create a local notebook from a language template
    New {
        /// Path of the source file (extension added when missing)
        path: PathBuf,

        #[arg(short, long, default_value = "javascript")]
        language: Language,

        #[arg(short, long)]
        title: Option<String>,

        /// Write the template without the typing effect
        #[arg(long)]
        no_animate: bool,
    },

    /// Execute a notebook source file
    Run {
        file: PathBuf,

        /// Override the language inferred from the file
        #[arg(short, long)]
        language: Option<Language>,

        /// Text passed to the program's standard input
        #[arg(long, conflicts_with = "stdin_file")]
        stdin: Option<String>,

        /// File passed to the program's standard input
        #[arg(long)]
        stdin_file: Option<PathBuf>,

        /// Serve HTML output in the sandboxed preview
        #[arg(long)]
        preview: bool,

        /// Preview port
        #[arg(short, long, default_value = "4173")]
        port: u16,
    },

    /// Re-run a notebook whenever it changes
    Watch {
        file: PathBuf,

        #[arg(short, long)]
        language: Option<Language>,

        #[arg(long)]
        stdin: Option<String>,

        /// Clear screen before each run
        #[arg(long, default_value = "true")]
        clear: bool,
    },

    /// Save a local notebook to your account
    Save {
        file: PathBuf,

        #[arg(short, long)]
        title: Option<String>,

        /// Make the notebook public
        #[arg(long, conflicts_with = "private")]
        public: bool,

        /// Make the notebook private
        #[arg(long)]
        private: bool,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Download a saved notebook
    Open {
        id: String,

        /// Output path (defaults to the notebook title)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve an HTML file in the sandboxed preview, reloading on change
    Preview {
        file: PathBuf,

        #[arg(short, long, default_value = "4173")]
        port: u16,
    },

    /// List open internal competitions
    Competitions,

    /// Show your mock-test results
    Results,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = AppContext::new(&cli.api_url, cli.session_file)?;

    match cli.command {
        Commands::Login {
            email,
            password,
            role,
        } => auth::login(&ctx, email, password, role).await?,

        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
            phone,
            role,
        } => {
            auth::signup(&ctx, name, email, password, confirm_password, phone, role).await?;
        }

        Commands::Logout => auth::logout(&ctx)?,

        Commands::Whoami => auth::whoami(&ctx)?,

        Commands::Languages => notebook::languages(),

        Commands::New {
            path,
            language,
            title,
            no_animate,
        } => notebook::create(&path, language, title, !no_animate).await?,

        Commands::Run {
            file,
            language,
            stdin,
            stdin_file,
            preview,
            port,
        } => {
            let stdin = match stdin_file {
                Some(path) => std::fs::read_to_string(path)?,
                None => stdin.unwrap_or_default(),
            };
            run::execute(&ctx, &file, language, &stdin, preview.then_some(port)).await?;
        }

        Commands::Watch {
            file,
            language,
            stdin,
            clear,
        } => watch::execute(&ctx, &file, language, stdin.unwrap_or_default(), clear).await?,

        Commands::Save {
            file,
            title,
            public,
            private,
            tags,
        } => {
            let visibility = match (public, private) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            notebook::save(&ctx, &file, title, visibility, tags).await?;
        }

        Commands::Open { id, output } => notebook::open(&ctx, &id, output).await?,

        Commands::Preview { file, port } => preview::execute(&file, port).await?,

        Commands::Competitions => dashboard::competitions(&ctx).await?,

        Commands::Results => dashboard::results(&ctx).await?,
    }

    Ok(())
}
