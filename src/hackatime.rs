use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;

use crate::summary::{parse_summary, TimeSummary};

/// 作業時間のサマリーを取得するためのtrait。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// 指定したユーザーの今日のサマリーを取得する。
    ///
    /// # Arguments
    ///
    /// * `user_id` - Slackのユーザーid
    async fn fetch_today(&self, user_id: &str) -> Result<TimeSummary>;
}

/// Hackatime APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = HackatimeClient::new(Client::new(), "https://hackatime.hackclub.com/api");
/// let summary = client.fetch_today("U0123456").await.unwrap();
/// ```
pub struct HackatimeClient {
    client: Client,
    api_url: String,
}

impl HackatimeClient {
    /// 新しい`HackatimeClient`を返す。
    pub fn new(client: Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TimeSource for HackatimeClient {
    async fn fetch_today(&self, user_id: &str) -> Result<TimeSummary> {
        let body = self
            .client
            .get(format!("{}/summary", self.api_url))
            .query(&[("user", user_id), ("interval", "today")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to Hackatime at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .bytes()
            .await
            .context("Failed to read Hackatime response")?;

        let summary = parse_summary(&body).context("Failed to parse Hackatime data")?;
        info!(
            "hackatime summary for {} ({} ~ {}): {} projects, {} languages",
            summary.user_id,
            summary.from,
            summary.to,
            summary.projects.len(),
            summary.languages.len()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use reqwest::Client;

    use super::{HackatimeClient, TimeSource};

    fn today_query(user: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("user".into(), user.into()),
            Matcher::UrlEncoded("interval".into(), "today".into()),
        ])
    }

    #[tokio::test]
    async fn test_fetch_today() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/summary")
            .match_query(today_query("U123"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"user_id":"U123","projects":[{"key":"myproj","total":9000}]}"#)
            .create_async()
            .await;

        let client = HackatimeClient::new(Client::new(), &server.url());
        let summary = client.fetch_today("U123").await.unwrap();

        mock.assert_async().await;
        assert_eq!(summary.user_id, "U123");
        assert_eq!(summary.projects.len(), 1);
        assert_eq!(summary.projects[0].total, 9000);
    }

    /// エラーステータスの場合は1回だけ問い合わせてエラーを返す。
    #[tokio::test]
    async fn test_fetch_today_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/summary")
            .match_query(today_query("U123"))
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = HackatimeClient::new(Client::new(), &server.url());
        let result = client.fetch_today("U123").await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_today_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/summary")
            .match_query(today_query("U123"))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HackatimeClient::new(Client::new(), &format!("{}/", server.url()));
        let result = client.fetch_today("U123").await;

        assert!(result.is_err());
    }
}
