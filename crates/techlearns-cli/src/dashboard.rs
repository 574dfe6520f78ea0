//! Dashboard commands: open competitions and mock-test results.

use chrono::Utc;
use techlearns_core::mock_test::summarize;

use crate::colors;
use crate::context::{AppContext, user_error};

pub async fn competitions(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let now = Utc::now();
    let competitions = ctx
        .client
        .dashboard()
        .competitions(&session, now)
        .await
        .map_err(user_error)?;

    println!("\n{}Upcoming competitions{}", colors::BOLD, colors::RESET);
    println!("{}", colors::rule());
    if competitions.is_empty() {
        println!("{}No upcoming competitions{}", colors::DIM, colors::RESET);
        return Ok(());
    }

    for competition in &competitions {
        let days = competition.days_remaining(now);
        let remaining = match days {
            0 => "ends today".to_string(),
            1 => "1 day left".to_string(),
            n => format!("{n} days left"),
        };
        println!(
            "  {}◆{} {}{}{} {}({}){}",
            colors::CYAN,
            colors::RESET,
            colors::BOLD,
            competition.title,
            colors::RESET,
            colors::YELLOW,
            remaining,
            colors::RESET
        );
        if !competition.description.is_empty() {
            println!("    {}", competition.description);
        }
        if let Some(prize) = &competition.prize {
            println!("    {}Prize:{} {}", colors::DIM, colors::RESET, prize);
        }
        if let Some(link) = &competition.registration_link {
            println!("    {}Register:{} {}", colors::DIM, colors::RESET, link);
        }
    }
    Ok(())
}

pub async fn results(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let results = ctx
        .client
        .dashboard()
        .my_results(&session)
        .await
        .map_err(user_error)?;

    println!("\n{}Mock test results{}", colors::BOLD, colors::RESET);
    println!("{}", colors::rule());
    if results.is_empty() {
        println!("{}No attempts yet{}", colors::DIM, colors::RESET);
        return Ok(());
    }

    for result in &results {
        let date = result
            .submitted_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "  {:<32} {:>6.1}/{:<6.1} {:>5.1}%  {}{}{}",
            result.test_name,
            result.score,
            result.total_marks,
            result.percentage(),
            colors::DIM,
            date,
            colors::RESET
        );
    }

    let summary = summarize(&results);
    println!("{}", colors::rule());
    println!(
        "{} attempts, average {:.1}%",
        summary.attempts, summary.average_percentage
    );
    if let Some(best) = &summary.best {
        println!(
            "{}Best:{} {} ({:.1}%)",
            colors::GREEN,
            colors::RESET,
            best.test_name,
            best.percentage()
        );
    }
    Ok(())
}
