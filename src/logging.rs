use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// 依存クレートのうち出力が多いもの。
const NOISY_TARGETS: [&str; 3] = ["hyper", "reqwest", "mio"];

/// ログの出力を設定する。
///
/// `report`サブコマンドは標準出力にレポートを出力するため、ログは標準エラー出力に出力する。
///
/// # Arguments
///
/// * `level` - 出力するログのレベル(`error`, `warn`, `info`, `debug`, `trace`, `off`)
pub fn init_logging(level: &str) -> Result<()> {
    let level = parse_level(level)?;
    dispatch(level)
        .chain(std::io::stderr())
        .apply()
        .context("Failed to initialize logger")?;

    Ok(())
}

/// 出力先を除いたログの設定を作成する。
fn dispatch(level: LevelFilter) -> fern::Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {} [{}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level);
    for target in NOISY_TARGETS {
        dispatch = dispatch.level_for(target, level.min(LevelFilter::Warn));
    }

    dispatch
}

/// ログのレベルをパースする。
fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level).map_err(|_| anyhow!("Invalid log level: {}", level))
}
