use crate::game::Game;

/// 閾値を超えたgameの下に表示する文言。
pub const ENCOURAGEMENT: &str = "You're on fire today, keep it up! :fire:";
/// レポートの最後に表示する文言。
pub const FOOTER: &str = "Keep building, every minute counts! :dog:";

/// レポートの表示設定。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// 作業時間に秒を含めるかどうか。
    pub include_seconds: bool,
    /// この秒数以上のgameには`ENCOURAGEMENT`を表示する。
    pub threshold_seconds: i64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_seconds: false,
            threshold_seconds: 7200,
        }
    }
}

/// gameごとの作業時間をSlackのメッセージとして整形する。
#[derive(Clone, Debug, Default)]
pub struct ReportRenderer {
    options: ReportOptions,
}

impl ReportRenderer {
    /// 新しい`ReportRenderer`を返す。
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// レポートを作成する。
    ///
    /// gameが空の場合はヘッダーのみを返す。
    ///
    /// # Arguments
    ///
    /// * `user_id` - Slackのユーザーid
    /// * `games` - 作業時間を計算済みのgame
    pub fn render(&self, user_id: &str, games: &[Game]) -> String {
        let mut report = format!("*Here is your activity for today, <@{}>:*\n", user_id);
        if games.is_empty() {
            return report;
        }

        for game in games {
            report.push_str(&format!(
                "\n*{}*\n{}\nTime spent today: {}\n",
                game.name,
                game.description,
                self.format_duration(game.total_seconds_today)
            ));
            if game.total_seconds_today >= self.options.threshold_seconds {
                report.push_str(ENCOURAGEMENT);
                report.push('\n');
            }
        }
        report.push('\n');
        report.push_str(FOOTER);
        report.push('\n');

        report
    }

    /// 秒数を`HH:MM`または`HH:MM:SS`の形式にする。
    fn format_duration(&self, total: i64) -> String {
        let hours = total.div_euclid(3600);
        let minutes = total.rem_euclid(3600) / 60;
        if self.options.include_seconds {
            let seconds = total.rem_euclid(60);
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", hours, minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ReportOptions, ReportRenderer, ENCOURAGEMENT, FOOTER};
    use crate::game::Game;

    fn game(name: &str, description: &str, total: i64) -> Game {
        Game {
            name: name.to_string(),
            description: description.to_string(),
            aliases: vec![],
            total_seconds_today: total,
        }
    }

    #[test]
    fn test_render() {
        let renderer = ReportRenderer::default();
        let games = vec![
            game("Shiba Quest", "A dog game", 9000),
            game("Bot", "Slack bot", 61),
        ];

        let report = renderer.render("U123", &games);

        let expected = format!(
            "*Here is your activity for today, <@U123>:*\n\
             \n*Shiba Quest*\nA dog game\nTime spent today: 02:30\n{}\n\
             \n*Bot*\nSlack bot\nTime spent today: 00:01\n\
             \n{}\n",
            ENCOURAGEMENT, FOOTER
        );
        assert_eq!(report, expected);
    }

    /// gameが無い場合はヘッダーのみ。
    #[test]
    fn test_render_no_games() {
        let report = ReportRenderer::default().render("U123", &[]);

        assert_eq!(report, "*Here is your activity for today, <@U123>:*\n");
    }

    /// 閾値ちょうどで表示し、1秒足りない場合は表示しない。
    #[rstest]
    #[case::below(7199, false)]
    #[case::exact(7200, true)]
    #[case::above(36000, true)]
    #[case::zero(0, false)]
    fn test_render_threshold(#[case] total: i64, #[case] expected: bool) {
        let report = ReportRenderer::default().render("U1", &[game("g", "d", total)]);

        assert_eq!(report.contains(ENCOURAGEMENT), expected);
    }

    #[test]
    fn test_render_custom_threshold() {
        let renderer = ReportRenderer::new(ReportOptions {
            threshold_seconds: 60,
            ..Default::default()
        });

        let report = renderer.render("U1", &[game("g", "d", 60)]);

        assert!(report.contains(ENCOURAGEMENT));
    }

    #[rstest]
    #[case::zero(0, false, "00:00")]
    #[case::minutes(59 * 60 + 59, false, "00:59")]
    #[case::hours(9000, false, "02:30")]
    #[case::long(100 * 3600, false, "100:00")]
    #[case::with_seconds(3661, true, "01:01:01")]
    #[case::with_seconds_zero(0, true, "00:00:00")]
    fn test_render_duration(
        #[case] total: i64,
        #[case] include_seconds: bool,
        #[case] expected: &str,
    ) {
        let renderer = ReportRenderer::new(ReportOptions {
            include_seconds,
            ..Default::default()
        });

        let report = renderer.render("U1", &[game("g", "d", total)]);

        assert!(report.contains(&format!("Time spent today: {}\n", expected)));
    }

    /// 同じ入力からは同じ出力になる。
    #[test]
    fn test_render_deterministic() {
        let renderer = ReportRenderer::default();
        let games = vec![game("a", "b", 7300), game("c", "", 10)];

        assert_eq!(renderer.render("U1", &games), renderer.render("U1", &games));
    }

    /// 入力の順序で表示する。
    #[test]
    fn test_render_keeps_order() {
        let games = vec![game("zeta", "", 0), game("alpha", "", 0)];

        let report = ReportRenderer::default().render("U1", &games);

        assert!(report.find("*zeta*").unwrap() < report.find("*alpha*").unwrap());
    }
}
