use thiserror::Error;

/// `today`コマンドの処理で発生するエラー。
#[derive(Debug, Error)]
pub enum TodayError {
    /// Hackatimeのサマリーが解釈できない。
    #[error("malformed summary: {0}")]
    MalformedSummary(String),

    /// Airtableにユーザーが存在しない。
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// ユーザーにgameが紐づいていない。
    #[error("no games linked to user: {0}")]
    NoGroupsLinked(String),

    /// Airtableへの問い合わせに失敗した。
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    /// Hackatimeからデータを取得できない。
    #[error("time source unavailable: {0}")]
    TimeSourceUnavailable(String),

    /// Slackへの通知に失敗した。
    ///
    /// 通知そのものが届かないため、ログに出力するだけでユーザーには返さない。
    #[error("notify failed: {0}")]
    NotifyFailed(String),
}

impl TodayError {
    /// ユーザーにephemeral messageとして返す固定の文言を返す。
    ///
    /// `NotifyFailed`の文言はログでの区別のためにあり、ユーザーには届かない。
    pub fn user_message(&self) -> &'static str {
        match self {
            TodayError::LookupFailed(_) => "Failed to get user from Airtable",
            TodayError::UserNotFound(_) => "User not found in Airtable",
            TodayError::NoGroupsLinked(_) => "User has no linked games",
            TodayError::TimeSourceUnavailable(_) | TodayError::MalformedSummary(_) => {
                "Failed to fetch Hackatime data"
            }
            TodayError::NotifyFailed(_) => "Failed to send the message to Slack",
        }
    }
}
