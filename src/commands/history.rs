use std::sync::Arc;
use tauri::State;

use crate::core::history::{self, HistoryStore};
use crate::models::{DisplayItem, HistoryUpdate};

#[tauri::command]
pub async fn get_download_history(
    history: State<'_, Arc<HistoryStore>>,
) -> Result<Vec<DisplayItem>, String> {
    Ok(history::render(&history.snapshot()))
}

/// Inbound "download completed" event for UI flows that talk to the
/// backend themselves. Duplicate urls are silently ignored.
#[tauri::command]
pub async fn record_download(
    url: String,
    title: Option<String>,
    history: State<'_, Arc<HistoryStore>>,
) -> Result<HistoryUpdate, String> {
    let outcome = history.record_download(&url, title.as_deref());

    Ok(HistoryUpdate {
        history: history::render(&outcome.log),
        persist_warning: outcome.persisted.err().map(|e| e.to_string()),
    })
}
