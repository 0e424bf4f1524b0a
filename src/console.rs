use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::error;

use crate::notifier::Notifier;

/// Slackの代わりにConsoleへメッセージを出力する。
///
/// `report`サブコマンドで利用するため、`response_url`は無視する。
pub struct ConsoleNotifier<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    /// 新しい`ConsoleNotifier`を返す。
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// 出力先を取り出す。
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_message(&self, text: &str) -> Result<()> {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{}", text).context("Failed to write message")?;
        writer.flush().context("Failed to flush message")?;

        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Notifier for ConsoleNotifier<W> {
    async fn notify(&self, _response_url: &str, text: &str) {
        if let Err(e) = self.write_message(text) {
            error!("{:#}", e);
        }
    }
}
