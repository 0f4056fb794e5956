//! Append-only audit log of conversation turns.

use breeze_core::Turn;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Append-only, human-readable turn log.
///
/// One formatted line per turn; the file is created on first use and
/// only ever appended to. This log lives outside the JSON store and is
/// not transactional with it: a crash between the two writes can leave
/// the log ahead of the persisted record.
pub struct TurnLog {
    path: PathBuf,
}

impl TurnLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Record one exchange: append a [`Turn`] to the in-memory history
    /// and one line to the log file.
    pub fn record(
        &self,
        user_input: &str,
        bot_reply: &str,
        history: &mut Vec<Turn>,
    ) -> anyhow::Result<()> {
        let turn = Turn::now(user_input, bot_reply);
        let line = format!(
            "{} | User: {} | Bot: {}\n",
            turn.timestamp.to_rfc3339(),
            turn.user,
            turn.bot
        );
        history.push(turn);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        debug!("Logged turn to {}", self.path.display());
        Ok(())
    }
}
