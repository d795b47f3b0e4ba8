//! daylit command-line application.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands::*};
use clap::Parser;
use cli::Cli;
use daylit_core::PlannerBuilder;
use log::info;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;
    info!("Using database {}", planner.database_path().display());

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));

    match command {
        Some(Task { command }) => cli.handle_task_command(command).await,
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Feedback(args)) => cli.feedback(args).await,
        Some(Settings { command }) => cli.handle_settings_command(command).await,
        Some(Optimize(args)) => cli.optimize(args).await,
        Some(Now) => cli.now().await,
        None => cli.show_today().await,
    }
}
