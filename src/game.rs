use crate::airtable::Record;
use crate::summary::ProjectTotal;

/// ユーザーのレコードでgameの参照を保持するフィールド名。
pub const LINKED_GAMES_FIELD: &str = "Games";
const NAME_FIELD: &str = "Name";
const DESCRIPTION_FIELD: &str = "Description";
const PROJECTS_FIELD: &str = "Hackatime Projects";

/// ユーザーが登録したgame。
///
/// `aliases`に含まれるHackatimeのプロジェクトの作業時間を合計して`total_seconds_today`とする。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub total_seconds_today: i64,
}

impl Game {
    /// Airtableのレコードから`Game`を作成する。
    ///
    /// 文字列でないフィールドは空として扱う。
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.string_field(NAME_FIELD).unwrap_or_default().to_string(),
            description: record
                .string_field(DESCRIPTION_FIELD)
                .unwrap_or_default()
                .to_string(),
            aliases: record
                .string_field(PROJECTS_FIELD)
                .map(split_aliases)
                .unwrap_or_default(),
            total_seconds_today: 0,
        }
    }
}

/// カンマまたは空白区切りのプロジェクト名を分割する。
pub fn split_aliases(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}

/// ユーザーに紐づくgameのレコードidを取得する。
///
/// フィールドが存在しない、リストでない、空の場合は`None`を返す。
/// 文字列でない要素は読み飛ばす。
pub fn linked_game_ids(user: &Record) -> Option<Vec<String>> {
    let linked = user.list_field(LINKED_GAMES_FIELD)?;
    if linked.is_empty() {
        return None;
    }

    Some(
        linked
            .iter()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect(),
    )
}

/// gameごとの今日の作業時間を計算する。
///
/// プロジェクト名は大文字小文字を区別せずに比較する。
/// 複数のgameに同じプロジェクトが含まれる場合は、それぞれのgameに加算する。
pub fn aggregate(games: &mut [Game], projects: &[ProjectTotal]) {
    for game in games.iter_mut() {
        let mut total: i64 = 0;
        for alias in &game.aliases {
            let alias = alias.to_lowercase();
            for project in projects {
                if project.key.to_lowercase() == alias {
                    total = total.saturating_add(project.total);
                }
            }
        }
        game.total_seconds_today = total;
    }
}
