use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::report::ReportOptions;

/// 外部サービスとレポートの設定。
///
/// 引数で指定しなかった値は環境変数から読み込む。
#[derive(Clone, Debug, clap::Args)]
pub struct BackendConfig {
    #[clap(
        long,
        env = "AIRTABLE_API_KEY",
        hide_env_values = true,
        help = "Airtable personal access token"
    )]
    pub airtable_api_key: String,

    #[clap(long, env = "AIRTABLE_BASE_ID", help = "Airtable base id")]
    pub airtable_base_id: String,

    #[clap(
        long,
        env = "AIRTABLE_API_URL",
        default_value = "https://api.airtable.com/v0",
        help = "Base url of the Airtable API"
    )]
    pub airtable_api_url: String,

    #[clap(
        long,
        env = "HACKATIME_API_URL",
        default_value = "https://hackatime.hackclub.com/api",
        help = "Base url of the Hackatime API"
    )]
    pub hackatime_api_url: String,

    #[clap(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        help = "Timeout in seconds for each outgoing request"
    )]
    pub request_timeout_secs: Option<u64>,

    #[clap(
        long,
        env = "REPORT_THRESHOLD_SECS",
        default_value = "7200",
        help = "Seconds of activity before a game gets an encouragement note"
    )]
    pub threshold_secs: i64,

    #[clap(long, help = "Show seconds in the time spent on each game")]
    pub include_seconds: bool,
}

impl BackendConfig {
    /// 外部サービスで共有するHTTPクライアントを作成する。
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build().context("Failed to create HTTP client")
    }

    /// レポートの表示設定を返す。
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            include_seconds: self.include_seconds,
            threshold_seconds: self.threshold_secs,
        }
    }
}
