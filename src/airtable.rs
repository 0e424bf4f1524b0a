use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

/// ユーザーのテーブル名。
pub const USERS_TABLE: &str = "Users";
/// gameのテーブル名。
pub const GAMES_TABLE: &str = "Games";
/// ユーザーテーブルでSlackのユーザーidを保持するフィールド名。
const SLACK_ID_FIELD: &str = "slack id";

/// Airtableの1レコード。
///
/// フィールドは文字列、文字列のリスト、他テーブルへの参照のリストなど型が混在する。
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// 文字列のフィールドを取得する。
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// リストのフィールドを取得する。
    pub fn list_field(&self, name: &str) -> Option<&Vec<Value>> {
        self.fields.get(name).and_then(Value::as_array)
    }
}

/// レコード一覧取得時のレスポンス。
#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<Record>,
}

/// レコードを読み出すためのtrait。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Slackのユーザーidに一致するユーザーを取得する。
    async fn find_user_by_external_id(&self, external_id: &str) -> Result<Option<Record>>;

    /// テーブルとレコードidを指定してレコードを取得する。
    async fn get_record_by_id(&self, table: &str, id: &str) -> Result<Option<Record>>;
}

/// Airtable APIと通信するためのクライアント。
pub struct AirtableClient {
    client: Client,
    api_url: String,
    api_key: String,
    base_id: String,
}

impl AirtableClient {
    /// 新しい`AirtableClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `client` - 共有するHTTPクライアント
    /// * `api_url` - Airtable APIのベースURL
    /// * `api_key` - Airtableのアクセストークン
    /// * `base_id` - 対象のbase id
    pub fn new(client: Client, api_url: &str, api_key: &str, base_id: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            base_id: base_id.to_string(),
        }
    }

    /// テーブル(とレコード)のURLを組み立てる。
    fn table_url(&self, table: &str, record_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid Airtable API url: {}", self.api_url))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Airtable API url cannot be a base: {}", self.api_url))?;
            segments.pop_if_empty().push(&self.base_id).push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }

        Ok(url)
    }
}

/// Airtableの式の文字列リテラルとして埋め込めるようにエスケープする。
fn escape_formula_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn find_user_by_external_id(&self, external_id: &str) -> Result<Option<Record>> {
        let formula = format!(
            "{{{}}}='{}'",
            SLACK_ID_FIELD,
            escape_formula_string(external_id)
        );
        let url = self.table_url(USERS_TABLE, None)?;
        let list = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to Airtable at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<RecordList>()
            .await
            .context("Failed to deserialize response")?;
        debug!("users matching {}: {}", external_id, list.records.len());

        Ok(list.records.into_iter().next())
    }

    async fn get_record_by_id(&self, table: &str, id: &str) -> Result<Option<Record>> {
        let url = self.table_url(table, Some(id))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Airtable at {}", self.api_url))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = response
            .error_for_status()
            .context("Request returned an error status")?
            .json::<Record>()
            .await
            .context("Failed to deserialize response")?;

        Ok(Some(record))
    }
}
