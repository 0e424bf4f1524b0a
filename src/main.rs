use anyhow::Result;
use clap::{Parser, Subcommand};

mod airtable;
mod config;
mod console;
mod error;
mod game;
mod hackatime;
mod logging;
mod notifier;
mod pipeline;
mod report;
mod report_command;
mod serve_command;
mod slash_command;
mod summary;

use report_command::{report_command, ReportArgs};
use serve_command::{serve_command, ServeArgs};

/// Slackの`today`コマンドでHackatimeの作業時間をgameごとに返すアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- serve --port 8080
/// $ cargo run -- report --user U0123456
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        long,
        global = true,
        env = "LOG_LEVEL",
        default_value = "info",
        help = "Log level"
    )]
    log_level: String,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Serve(ServeArgs),
    Report(ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(&args.log_level)?;

    match args.subcommand {
        SubCommands::Serve(serve) => serve_command(serve).await?,
        SubCommands::Report(report) => report_command(report).await?,
    }

    Ok(())
}
