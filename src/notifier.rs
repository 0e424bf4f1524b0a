use async_trait::async_trait;
use log::{debug, error};
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::Serialize;

use crate::error::TodayError;

/// 結果をユーザーに通知するためのtrait。
///
/// 通知の失敗は呼び出し元に返さずログに出力する。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// メッセージを通知する。
    ///
    /// # Arguments
    ///
    /// * `response_url` - 通知先のURL
    /// * `text` - 通知するメッセージ
    async fn notify(&self, response_url: &str, text: &str);
}

/// Slackに送信するメッセージ。
#[derive(Debug, Serialize)]
struct SlackResponse<'a> {
    response_type: &'a str,
    text: &'a str,
}

/// Slackの`response_url`にephemeral messageを送信する。
pub struct SlackNotifier {
    client: Client,
}

impl SlackNotifier {
    /// 新しい`SlackNotifier`を返す。
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// メッセージを1回だけ送信する。
    async fn post_ephemeral(&self, response_url: &str, text: &str) -> Result<(), TodayError> {
        let message = SlackResponse {
            response_type: "ephemeral",
            text,
        };
        self.client
            .post(response_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| TodayError::NotifyFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| TodayError::NotifyFailed(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, response_url: &str, text: &str) {
        match self.post_ephemeral(response_url, text).await {
            Ok(()) => debug!("Sent ephemeral message to {}", response_url),
            Err(e) => error!("Failed to send ephemeral message to {}: {}", response_url, e),
        }
    }
}
