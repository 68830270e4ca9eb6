//! Moonlit CLI - Play, shop, and sync from the terminal
//!
//! Usage:
//!   moonlit login [--name <name>]   - Log in (or create) a profile
//!   moonlit status                  - Show the current adventurer
//!   moonlit play <activity>         - Play a round of a mini-game
//!   moonlit quest [claim <id>]      - List quests or claim a reward
//!   moonlit shop [buy <cat> <id>]   - Browse or buy
//!   moonlit rest                    - Spend gems to restore energy
//!   moonlit profiles                - List profiles on this device

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;

use commands::{
    LoginCommand, LogoutCommand, PlayCommand, ProfilesCommand, QuestCommand, RestCommand,
    ShopCommand, StatusCommand,
};
use context::Context;

#[derive(Parser)]
#[command(name = "moonlit")]
#[command(about = "Moonlit - A cozy learning adventure, from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Where the local database and session cache live
    #[arg(long, global = true, default_value = ".moonlit")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to a profile by name, creating it if new
    Login(LoginCommand),
    /// Forget the cached session
    Logout(LogoutCommand),
    /// Show level, energy, badges, and recent rewards
    Status(StatusCommand),
    /// Play a round of a mini-game
    Play(PlayCommand),
    /// List quests or claim a finished one
    Quest(QuestCommand),
    /// Browse the shop or buy an item
    Shop(ShopCommand),
    /// Spend 2 gems to restore energy
    Rest(RestCommand),
    /// List every profile on this device
    Profiles(ProfilesCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = Context::open(&cli.data_dir)?;
    ctx.restore_session().await;

    let result = match &cli.command {
        Commands::Login(cmd) => cmd.run(&ctx).await,
        Commands::Logout(cmd) => cmd.run(&ctx).await,
        Commands::Status(cmd) => cmd.run(&ctx).await,
        Commands::Play(cmd) => cmd.run(&ctx).await,
        Commands::Quest(cmd) => cmd.run(&ctx).await,
        Commands::Shop(cmd) => cmd.run(&ctx).await,
        Commands::Rest(cmd) => cmd.run(&ctx).await,
        Commands::Profiles(cmd) => cmd.run(&ctx).await,
    };

    // Push anything the command left unsaved
    ctx.client.shutdown().await;
    result
}
