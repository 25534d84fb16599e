//! On-disk copy of the last combined dataset served.

use std::path::{Path, PathBuf};

use market_core::CombinedRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub data: Vec<CombinedRecord>,
}

#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, snapshot: &Snapshot) -> std::io::Result<()> {
        let body = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&self.path, body).await
    }

    /// Write on a detached task. Failures are logged, never returned.
    pub fn spawn_write(&self, symbol: &str, records: Vec<CombinedRecord>) -> tokio::task::JoinHandle<()> {
        let writer = self.clone();
        let snapshot = Snapshot {
            symbol: symbol.to_string(),
            data: records,
        };
        tokio::spawn(async move {
            match writer.write(&snapshot).await {
                Ok(()) => tracing::debug!(
                    symbol = %snapshot.symbol,
                    path = %writer.path.display(),
                    records = snapshot.data.len(),
                    "snapshot saved"
                ),
                Err(e) => tracing::warn!(
                    symbol = %snapshot.symbol,
                    path = %writer.path.display(),
                    error = %e,
                    "failed to save snapshot"
                ),
            }
        })
    }
}

/// Load a snapshot previously written by [`SnapshotWriter`].
pub async fn read_snapshot(path: impl AsRef<Path>) -> std::io::Result<Snapshot> {
    let raw = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> CombinedRecord {
        CombinedRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            price: 100.0,
            symbol: "AAPL".to_string(),
            volume: 1000,
            raw_prediction: 101.0,
            sentiment: 0.5,
            final_prediction: 60.75,
        }
    }

    #[tokio::test]
    async fn test_spawned_write_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("market_data.json"));

        writer.spawn_write("AAPL", vec![record()]).await.unwrap();

        let snapshot = read_snapshot(writer.path()).await.unwrap();
        assert_eq!(snapshot.symbol, "AAPL");
        assert_eq!(snapshot.data, vec![record()]);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("missing").join("market_data.json"));
        assert!(writer.spawn_write("AAPL", vec![record()]).await.is_ok());
        assert!(read_snapshot(writer.path()).await.is_err());
    }
}
