use serde::{Deserialize, Serialize};

/// One completed download. `url` is the identity key for dedup;
/// `timestamp` is an opaque display string and is never reparsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub url: String,
    pub title: String,
    pub timestamp: String,
}

/// Ordered history, newest first. Persisted as a bare JSON array of
/// records, matching the snapshot the renderer historically kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    pub entries: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn contains_url(&self, url: &str) -> bool {
        self.entries.iter().any(|record| record.url == url)
    }
}

/// Read-only projection of the log for the list view. Entries carry
/// the url so the UI can repopulate the input on click.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayItem {
    Entry {
        title: String,
        url: String,
        timestamp: String,
    },
    Placeholder {
        message: String,
    },
}

// --- Backend wire shapes ---

#[derive(Debug, Clone, Serialize)]
pub struct ProcessVideoRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessVideoResponse {
    pub success: bool,
    pub video_title: Option<String>,
    pub session_folder: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    pub error: Option<String>,
}

/// Health probe result. Never an Err at the command boundary; an
/// unreachable backend is a state the UI displays, not a failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHealth {
    pub reachable: bool,
    pub detail: Option<serde_json::Value>,
    pub error: Option<String>,
}

// --- Command payloads ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    pub result: ProcessVideoResponse,
    pub history: Vec<DisplayItem>,
    /// Set when the history snapshot could not be written; the record
    /// is still in the session log but may not survive a restart.
    pub persist_warning: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryUpdate {
    pub history: Vec<DisplayItem>,
    pub persist_warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_log_serializes_as_bare_array() {
        let log = HistoryLog {
            entries: vec![HistoryRecord {
                url: "https://a.test/v1".into(),
                title: "Video A".into(),
                timestamp: "2026-08-27 10:00:00".into(),
            }],
        };

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.starts_with('['));

        let back: HistoryLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, log.entries);
    }

    #[test]
    fn process_response_parses_success_and_failure_bodies() {
        let ok: ProcessVideoResponse = serde_json::from_str(
            r#"{"success": true, "video_title": "Lecture 3",
                "session_folder": "/tmp/out", "files": ["notes.md", "audio.mp3"]}"#,
        )
        .unwrap();
        assert!(ok.success);
        assert_eq!(ok.video_title.as_deref(), Some("Lecture 3"));
        assert_eq!(ok.files.len(), 2);

        let failed: ProcessVideoResponse =
            serde_json::from_str(r#"{"success": false, "error": "Invalid URL"}"#).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("Invalid URL"));
        assert!(failed.files.is_empty());
    }

    #[test]
    fn request_omits_unset_optional_fields() {
        let request = ProcessVideoRequest {
            url: "https://a.test/v1".into(),
            page_number: None,
            download_dir: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("page_number"));
        assert!(!json.contains("download_dir"));
    }
}
