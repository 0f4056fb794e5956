//! JSON document store for per-user turn histories.

use async_trait::async_trait;
use breeze_core::{ConversationStore, Turn};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// The full durable record: user id mapped to an ordered turn history.
pub type ConversationRecord = BTreeMap<String, Vec<Turn>>;

/// File-backed [`ConversationStore`].
///
/// The whole record is the unit of storage. `save` is a
/// read-modify-write of the entire document with no locking, so
/// concurrent writers to the same file are last-writer-wins.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the full record from disk.
    ///
    /// A missing file is an empty record. Any other read or parse
    /// failure propagates; there is no recovery policy for a corrupt
    /// store.
    pub fn load_record(&self) -> anyhow::Result<ConversationRecord> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let record: ConversationRecord = serde_json::from_str(&content)?;
                debug!("Loaded record with {} user(s)", record.len());
                Ok(record)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file {} not found, empty record", self.path.display());
                Ok(ConversationRecord::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the full record back, replacing the file contents.
    pub fn save_record(&self, record: &ConversationRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for JsonStore {
    async fn load(&self, user_id: &str) -> anyhow::Result<Vec<Turn>> {
        let record = self.load_record()?;
        Ok(record.get(user_id).cloned().unwrap_or_default())
    }

    async fn save(&self, user_id: &str, history: &[Turn]) -> anyhow::Result<()> {
        let mut record = self.load_record()?;
        record.insert(user_id.to_string(), history.to_vec());
        self.save_record(&record)?;
        info!(
            "Saved {} turn(s) for user {} to {}",
            history.len(),
            user_id,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_history(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| Turn::now(format!("question {i}"), format!("answer {i}")))
            .collect()
    }

    #[tokio::test]
    async fn missing_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("memory.json"));

        let history = store.load("user123").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("memory.json"));

        store.save("alice", &sample_history(2)).await.unwrap();

        let history = store.load("bob").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("memory.json"));
        let history = sample_history(3);

        store.save("user123", &history).await.unwrap();

        let loaded = store.load("user123").await.unwrap();
        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn save_overwrites_previous_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("memory.json"));

        let first = sample_history(2);
        let second = sample_history(5);
        store.save("user123", &first).await.unwrap();
        store.save("user123", &second).await.unwrap();

        let loaded = store.load("user123").await.unwrap();
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn save_leaves_other_users_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("memory.json"));

        let alice = sample_history(2);
        store.save("alice", &alice).await.unwrap();
        store.save("bob", &sample_history(1)).await.unwrap();

        assert_eq!(store.load("alice").await.unwrap(), alice);
    }

    #[tokio::test]
    async fn full_record_round_trip_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("memory.json"));

        store.save("alice", &sample_history(2)).await.unwrap();
        store.save("bob", &sample_history(3)).await.unwrap();

        let record = store.load_record().unwrap();
        store.save_record(&record).unwrap();

        assert_eq!(store.load_record().unwrap(), record);
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "not json at all {").unwrap();

        let store = JsonStore::new(path);
        assert!(store.load_record().is_err());
    }
}
