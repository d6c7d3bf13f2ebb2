//! JSON file holding the latest signal per symbol.
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! so readers never observe a half-written document.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{error, info};

use super::error::StoreError;
use crate::models::SignalRecord;

pub struct SignalFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SignalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest record per symbol, in first-seen order.
    ///
    /// A missing or empty file reads as no signals.
    pub async fn load(&self) -> Result<Vec<SignalRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let records: Vec<SignalRecord> = serde_json::from_slice(&bytes)?;
        Ok(latest_per_symbol(records))
    }

    /// Insert or replace the record for its symbol, compared case-insensitively.
    pub async fn upsert(&self, record: SignalRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        match records.iter_mut().find(|r| r.symbol.eq_ignore_ascii_case(&record.symbol)) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        let tmp = self.tmp_path();
        let json = serde_json::to_vec_pretty(&records)?;
        if let Err(e) = write_and_rename(&tmp, &self.path, &json).await {
            error!(path = %self.path.display(), error = %e, "Error saving signal to {}", self.path.display());
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        info!(path = %self.path.display(), "Latest signal written to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

async fn write_and_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(tmp, bytes).await?;
    tokio::fs::rename(tmp, target).await
}

/// Keep only the last record seen for each symbol.
pub fn latest_per_symbol(records: Vec<SignalRecord>) -> Vec<SignalRecord> {
    let mut latest: Vec<SignalRecord> = Vec::new();
    for record in records {
        match latest.iter_mut().find(|r| r.symbol.eq_ignore_ascii_case(&record.symbol)) {
            Some(existing) => *existing = record,
            None => latest.push(record),
        }
    }
    latest
}
