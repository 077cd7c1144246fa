use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use chrono::Local;
use thiserror::Error;
use tracing::warn;

use crate::models::{DisplayItem, HistoryLog, HistoryRecord};

/// Retention cap. Inserting past this evicts the oldest (tail) entries.
pub const HISTORY_CAP: usize = 20;

/// Stored when a download completes without a usable title.
pub const UNKNOWN_TITLE: &str = "unknown title";

/// Shown by `render` when the log is empty.
pub const NO_HISTORY_MESSAGE: &str = "No download history yet";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to serialize history snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write history snapshot: {0}")]
    Write(#[from] std::io::Error),
}

/// Result of `record_download`. The log always reflects the mutation;
/// `persisted` reports whether the snapshot made it to disk. A failed
/// write is non-fatal but means the record may not survive a restart.
pub struct RecordOutcome {
    pub log: HistoryLog,
    pub persisted: Result<(), HistoryError>,
}

/// Owns the download history log and mediates all reads/writes of its
/// on-disk snapshot. Injected into commands as Tauri managed state;
/// the mutex serializes handlers, so each mutation is a complete
/// read-modify-write-persist cycle.
pub struct HistoryStore {
    log: Mutex<HistoryLog>,
    file_path: PathBuf,
}

impl HistoryStore {
    pub fn open(file_path: PathBuf) -> Self {
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                let _ = fs::create_dir_all(parent);
            }
        }

        let log = Self::load(&file_path);

        Self {
            log: Mutex::new(log),
            file_path,
        }
    }

    pub fn open_default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self::open(home.join(".audio2note").join("history.json"))
    }

    /// Reads the persisted snapshot. A missing or unparseable snapshot
    /// is "no history yet", never an error; corruption is logged and
    /// the log starts over empty.
    pub fn load(path: &Path) -> HistoryLog {
        if !path.exists() {
            return HistoryLog::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read history snapshot {:?}: {}", path, e);
                return HistoryLog::default();
            }
        };

        match serde_json::from_str::<HistoryLog>(&content) {
            Ok(log) => log,
            Err(e) => {
                warn!("Discarding malformed history snapshot {:?}: {}", path, e);
                HistoryLog::default()
            }
        }
    }

    pub fn snapshot(&self) -> HistoryLog {
        self.log.lock().unwrap().clone()
    }

    /// Records a completed download. Duplicate urls (exact string
    /// match) are a no-op: the existing entry keeps its title and
    /// timestamp and is not moved to the front. New records are
    /// prepended and the log truncated to `HISTORY_CAP` before the
    /// full snapshot is rewritten.
    pub fn record_download(&self, url: &str, title: Option<&str>) -> RecordOutcome {
        let mut log = self.log.lock().unwrap();

        if log.contains_url(url) {
            return RecordOutcome {
                log: log.clone(),
                persisted: Ok(()),
            };
        }

        let title = match title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => UNKNOWN_TITLE.to_string(),
        };

        log.entries.insert(
            0,
            HistoryRecord {
                url: url.to_string(),
                title,
                timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        );
        log.entries.truncate(HISTORY_CAP);

        let persisted = self.persist(&log);
        if let Err(ref e) = persisted {
            warn!("History snapshot write failed, record kept in memory only: {}", e);
        }

        RecordOutcome {
            log: log.clone(),
            persisted,
        }
    }

    /// Full-snapshot overwrite via tmp + rename, so the slot never
    /// holds a half-written file.
    fn persist(&self, log: &HistoryLog) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(log)?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.file_path)?;

        Ok(())
    }
}

/// Pure projection of a log into display items, preserving log order.
/// An empty log maps to a single placeholder item so the list view
/// always has something to show.
pub fn render(log: &HistoryLog) -> Vec<DisplayItem> {
    if log.entries.is_empty() {
        return vec![DisplayItem::Placeholder {
            message: NO_HISTORY_MESSAGE.to_string(),
        }];
    }

    log.entries
        .iter()
        .map(|record| DisplayItem::Entry {
            title: record.title.clone(),
            url: record.url.clone(),
            timestamp: record.timestamp.clone(),
        })
        .collect()
}
