//! Account commands: login, signup, logout, whoami.

use techlearns_client::RegisterOutcome;
use techlearns_core::status::{DismissPolicy, OperationStatus};
use techlearns_core::validation::{LoginForm, SignupForm};
use techlearns_core::{Session, SessionContext, UserType};

use crate::colors;
use crate::context::{AppContext, tracked};

pub async fn login(
    ctx: &AppContext,
    email: String,
    password: String,
    user_type: UserType,
) -> anyhow::Result<()> {
    let form = LoginForm {
        email,
        password,
        user_type,
    };

    let auth = ctx.client.auth();
    let mut status = OperationStatus::new(DismissPolicy::Sticky);
    let session = tracked(
        &mut status,
        |s: &Session| format!("Logged in as {}", display_name(s)),
        auth.login(&form),
    )
    .await?;

    ctx.store.save(&session)?;
    print_landing(session);
    Ok(())
}

pub async fn signup(
    ctx: &AppContext,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
    phone: Option<String>,
    user_type: UserType,
) -> anyhow::Result<()> {
    let form = SignupForm {
        name,
        email,
        password,
        confirm_password,
        phone,
        user_type,
    };

    let auth = ctx.client.auth();
    let mut status = OperationStatus::new(DismissPolicy::Sticky);
    let outcome = tracked(
        &mut status,
        |_| format!("{} account created", user_type),
        auth.register(&form),
    )
    .await?;

    match outcome {
        RegisterOutcome::LoggedIn(session) => {
            ctx.store.save(&session)?;
            print_landing(session);
        }
        RegisterOutcome::LoginRequired => {
            println!(
                "Please log in: {}techlearns login --role {} --email {}{}",
                colors::CYAN,
                user_type,
                form.email,
                colors::RESET
            );
        }
    }
    Ok(())
}

pub fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.store.clear()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let context = ctx.session()?;
    let Some(session) = context.current() else {
        println!("Not logged in");
        return Ok(());
    };

    println!("{}{}{}", colors::BOLD, display_name(session), colors::RESET);
    if !session.user_info.email.is_empty() {
        println!("  {}◆ Email:{} {}", colors::CYAN, colors::RESET, session.user_info.email);
    }
    println!("  {}◆ Role:{} {}", colors::CYAN, colors::RESET, session.user_type);
    if let Some(expires) = session.expires_at() {
        println!(
            "  {}◆ Expires:{} {}",
            colors::CYAN,
            colors::RESET,
            expires.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}

fn display_name(session: &Session) -> &str {
    if session.user_info.name.is_empty() {
        &session.user_info.email
    } else {
        &session.user_info.name
    }
}

fn print_landing(session: Session) {
    let context = SessionContext::with_session(session);
    println!(
        "{}Dashboard:{} {}",
        colors::DIM,
        colors::RESET,
        context.redirect_target()
    );
}
