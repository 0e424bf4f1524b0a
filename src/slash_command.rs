use serde::Deserialize;

/// Slackのslash commandで送られてくるフォームの内容。
///
/// 送られてこなかったフィールドは空文字列になる。
/// `token`, `team_id`, `channel_id`, `trigger_id`は受け取るだけで利用しない。
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlashCommand {
    #[allow(dead_code)]
    pub token: String,
    #[allow(dead_code)]
    pub team_id: String,
    pub team_domain: String,
    pub user_id: String,
    pub user_name: String,
    #[allow(dead_code)]
    pub channel_id: String,
    pub channel_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    #[allow(dead_code)]
    pub trigger_id: String,
}

impl SlashCommand {
    /// Slackを介さずに指定したユーザーのコマンドを作成する。
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            command: "/today".to_string(),
            ..Default::default()
        }
    }
}
