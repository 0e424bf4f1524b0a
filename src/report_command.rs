use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::config::BackendConfig;
use crate::console::ConsoleNotifier;
use crate::pipeline::TodayPipeline;
use crate::slash_command::SlashCommand;

/// 指定したユーザーの今日のレポートをConsoleに出力するサブコマンド。
#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    #[clap(short = 'u', long = "user", help = "Slack user id to report on")]
    user_id: String,

    #[clap(flatten)]
    backend: BackendConfig,
}

/// `report`サブコマンドの処理を行う。
///
/// Slackへは送信せず、`today`コマンドと同じ内容を標準出力に表示する。
///
/// # Arguments
///
/// * `args` - `report`サブコマンドの引数
pub async fn report_command(args: ReportArgs) -> Result<()> {
    let client = args.backend.http_client()?;
    let notifier = Arc::new(ConsoleNotifier::new(io::stdout()));
    let pipeline = TodayPipeline::from_config(&args.backend, client, notifier);

    pipeline
        .run(&SlashCommand::for_user(&args.user_id))
        .await
        .with_context(|| format!("Failed to build today's report for {}", args.user_id))?;
    info!("Report printed successfully.");

    Ok(())
}
