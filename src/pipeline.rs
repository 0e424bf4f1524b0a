use std::sync::Arc;

use log::{info, warn};
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::airtable::{AirtableClient, RecordStore, GAMES_TABLE};
use crate::config::BackendConfig;
use crate::error::TodayError;
use crate::game::{aggregate, linked_game_ids, Game};
use crate::hackatime::{HackatimeClient, TimeSource};
use crate::notifier::Notifier;
use crate::report::ReportRenderer;
use crate::slash_command::SlashCommand;

/// `today`コマンドの結果を作成して通知する。
///
/// Airtableからユーザーとgameを取得し、Hackatimeの今日の作業時間をgameごとに集計して通知する。
/// 外部サービスへの問い合わせはそれぞれ1回だけ行い、再試行はしない。
pub struct TodayPipeline {
    store: Arc<dyn RecordStore>,
    time_source: Arc<dyn TimeSource>,
    notifier: Arc<dyn Notifier>,
    renderer: ReportRenderer,
}

impl TodayPipeline {
    /// 新しい`TodayPipeline`を返す。
    pub fn new(
        store: Arc<dyn RecordStore>,
        time_source: Arc<dyn TimeSource>,
        notifier: Arc<dyn Notifier>,
        renderer: ReportRenderer,
    ) -> Self {
        Self {
            store,
            time_source,
            notifier,
            renderer,
        }
    }

    /// 設定からAirtableとHackatimeのクライアントを作成して`TodayPipeline`を返す。
    ///
    /// # Arguments
    ///
    /// * `config` - 外部サービスとレポートの設定
    /// * `client` - 外部サービスで共有するHTTPクライアント
    /// * `notifier` - 結果の通知先
    pub fn from_config(
        config: &BackendConfig,
        client: Client,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = AirtableClient::new(
            client.clone(),
            &config.airtable_api_url,
            &config.airtable_api_key,
            &config.airtable_base_id,
        );
        let time_source = HackatimeClient::new(client, &config.hackatime_api_url);

        Self::new(
            Arc::new(store),
            Arc::new(time_source),
            notifier,
            ReportRenderer::new(config.report_options()),
        )
    }

    /// 別タスクで`run`を実行する。
    ///
    /// 戻り値のハンドルは待たずに捨ててよい。タスクのキャンセルやタイムアウトは行わない。
    pub fn spawn(self: &Arc<Self>, command: SlashCommand) -> JoinHandle<()> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let _ = pipeline.run(&command).await;
        })
    }

    /// レポートを作成して通知する。
    ///
    /// 途中で失敗した場合はエラーに対応する文言を通知し、エラーを返す。
    pub async fn run(&self, command: &SlashCommand) -> Result<(), TodayError> {
        info!("Building today's report for {}", command.user_id);
        let result = self.build_report(&command.user_id).await;
        let text = match &result {
            Ok(report) => report.as_str(),
            Err(e) => {
                warn!("Failed to build report for {}: {}", command.user_id, e);
                e.user_message()
            }
        };
        self.notifier.notify(&command.response_url, text).await;
        info!("Finished today's report for {}", command.user_id);

        result.map(|_| ())
    }

    async fn build_report(&self, user_id: &str) -> Result<String, TodayError> {
        let user = self
            .store
            .find_user_by_external_id(user_id)
            .await
            .map_err(|e| TodayError::LookupFailed(format!("{:#}", e)))?
            .ok_or_else(|| TodayError::UserNotFound(user_id.to_string()))?;
        let game_ids =
            linked_game_ids(&user).ok_or_else(|| TodayError::NoGroupsLinked(user_id.to_string()))?;

        let mut games = self.resolve_games(&game_ids).await;

        let summary = self
            .time_source
            .fetch_today(user_id)
            .await
            .map_err(|e| TodayError::TimeSourceUnavailable(format!("{:#}", e)))?;

        aggregate(&mut games, &summary.projects);

        Ok(self.renderer.render(user_id, &games))
    }

    /// gameのレコードを順番に取得する。
    ///
    /// 取得できなかったgameは読み飛ばす。
    async fn resolve_games(&self, game_ids: &[String]) -> Vec<Game> {
        let mut games = Vec::with_capacity(game_ids.len());
        for game_id in game_ids {
            match self.store.get_record_by_id(GAMES_TABLE, game_id).await {
                Ok(Some(record)) => games.push(Game::from_record(&record)),
                Ok(None) => warn!("Game {} was not found, skipping", game_id),
                Err(e) => warn!("Failed to get game {}, skipping: {:#}", game_id, e),
            }
        }

        games
    }
}
