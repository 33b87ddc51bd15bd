//! copydesk — a local, versioned store for app listing copy with safe
//! reconciliation against App Store Connect.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "copydesk",
    version,
    about = "Versioned app-listing copy, reconciled against App Store Connect"
)]
struct Cli {
    /// Project root containing the .appstore directory.
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a field's latest content and full iteration history.
    Read(commands::read::ReadArgs),
    /// Append a new iteration to a field's history.
    Write(commands::write::WriteArgs),
    /// Compare local copy against the remote store and print a diff table.
    Status(commands::status::StatusArgs),
    /// Validate stored copy against character limits.
    Validate(commands::validate::ValidateArgs),
    /// List locales, IAP products, or release-note versions.
    List(commands::list::ListArgs),
    /// Issue a raw authenticated request against the remote API.
    Request(commands::request::RequestArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("copydesk=info")),
        )
        .init();

    let Cli { root, command } = Cli::parse();
    match command {
        Command::Read(args) => commands::read::run(&root, args).await,
        Command::Write(args) => commands::write::run(&root, args).await,
        Command::Status(args) => commands::status::run(&root, args).await,
        Command::Validate(args) => commands::validate::run(&root, args).await,
        Command::List(args) => commands::list::run(&root, args).await,
        Command::Request(args) => commands::request::run(&root, args).await,
    }
}
