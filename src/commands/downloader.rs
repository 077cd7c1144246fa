use std::sync::Arc;
use tauri::{AppHandle, State};
use tauri_plugin_notification::NotificationExt;
use tracing::{error, info};
use url::Url;

use crate::config::ConfigManager;
use crate::core::backend::BackendClient;
use crate::core::history::{self, HistoryStore};
use crate::models::{ProcessOutcome, ProcessVideoRequest};

/// Mirrors the backend's own admission check so obviously broken
/// input never leaves the shell.
fn validate_url(url: &str) -> Result<(), String> {
    if url.trim().len() < 10 {
        return Err("Invalid URL provided.".into());
    }

    let parsed = Url::parse(url).map_err(|_| "Invalid URL provided.".to_string())?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err("Only http(s) links are supported.".into());
    }

    Ok(())
}

/// Submits a video to the backend and, on success, records it in the
/// download history. Only `success` and `video_title` from the
/// response feed the history decision; everything else passes through
/// to the UI untouched.
#[tauri::command]
pub async fn process_video(
    app: AppHandle,
    url: String,
    page_number: Option<u32>,
    download_dir: Option<String>,
    backend: State<'_, Arc<BackendClient>>,
    history: State<'_, Arc<HistoryStore>>,
    config: State<'_, Arc<ConfigManager>>,
) -> Result<ProcessOutcome, String> {
    validate_url(&url)?;

    // Explicit folder choice wins over the configured default.
    let download_dir = download_dir.or_else(|| config.get_config().general.download_path);

    let request = ProcessVideoRequest {
        url: url.clone(),
        page_number,
        download_dir,
    };

    let result = backend.process_video(&request).await.map_err(|e| {
        error!("Backend call failed for {}: {}", url, e);
        e.to_string()
    })?;

    if !result.success {
        info!(
            "Backend rejected {}: {}",
            url,
            result.error.as_deref().unwrap_or("unknown error")
        );
        return Ok(ProcessOutcome {
            history: history::render(&history.snapshot()),
            persist_warning: None,
            result,
        });
    }

    let outcome = history.record_download(&url, result.video_title.as_deref());
    let persist_warning = outcome.persisted.err().map(|e| e.to_string());

    let title = result.video_title.as_deref().unwrap_or(history::UNKNOWN_TITLE);
    info!("Download completed: {} ({})", title, url);

    let _ = app
        .notification()
        .builder()
        .title("Download complete")
        .body(title)
        .show();

    Ok(ProcessOutcome {
        history: history::render(&outcome.log),
        persist_warning,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_or_garbage_urls_are_rejected() {
        assert!(validate_url("http://a").is_err());
        assert!(validate_url("definitely not a url at all").is_err());
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(validate_url("ftp://example.com/video").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn plain_https_links_pass() {
        assert!(validate_url("https://example.com/watch?v=abc123").is_ok());
    }
}
