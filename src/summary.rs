use serde::Deserialize;
use serde_json::Value;

use crate::error::TodayError;

/// Hackatimeの1日分のサマリー。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeSummary {
    pub user_id: String,
    pub from: String,
    pub to: String,
    pub projects: Vec<ProjectTotal>,
    /// 集計には利用していないが、レスポンスの内容として保持する。
    pub languages: Vec<LanguageTotal>,
}

/// プロジェクトごとの作業時間(秒)。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectTotal {
    pub key: String,
    pub total: i64,
}

/// 言語ごとの作業時間(秒)。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageTotal {
    pub key: String,
    pub total: i64,
}

/// Hackatime APIのレスポンスをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct HackatimeSummary {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    projects: Option<Vec<HackatimeTotal>>,
    #[serde(default)]
    languages: Option<Vec<HackatimeTotal>>,
}

#[derive(Debug, Deserialize)]
struct HackatimeTotal {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    total: Option<i64>,
}

/// Hackatimeのサマリーをパースする。
///
/// `projects`や`languages`が存在しない場合は空のリストとして扱う。
/// 各エントリーの`key`や`total`が無い、またはnullの場合は空文字列と0として扱う。
/// トップレベルがJSONオブジェクトでない場合はエラーを返す。
///
/// # Arguments
///
/// * `data` - Hackatime APIのレスポンスボディ
pub fn parse_summary(data: &[u8]) -> Result<TimeSummary, TodayError> {
    let value: Value =
        serde_json::from_slice(data).map_err(|e| TodayError::MalformedSummary(e.to_string()))?;
    if !value.is_object() {
        return Err(TodayError::MalformedSummary(
            "top level is not an object".to_string(),
        ));
    }
    let raw: HackatimeSummary =
        serde_json::from_value(value).map_err(|e| TodayError::MalformedSummary(e.to_string()))?;

    Ok(TimeSummary {
        user_id: raw.user_id.unwrap_or_default(),
        from: raw.from.unwrap_or_default(),
        to: raw.to.unwrap_or_default(),
        projects: raw
            .projects
            .unwrap_or_default()
            .into_iter()
            .map(|p| ProjectTotal {
                key: p.key.unwrap_or_default(),
                total: p.total.unwrap_or_default(),
            })
            .collect(),
        languages: raw
            .languages
            .unwrap_or_default()
            .into_iter()
            .map(|l| LanguageTotal {
                key: l.key.unwrap_or_default(),
                total: l.total.unwrap_or_default(),
            })
            .collect(),
    })
}
