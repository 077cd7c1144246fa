use std::path::Path;
use std::sync::Arc;
use serde::Deserialize;
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, ConfigManager, GeneralConfig, WindowConfig};
use crate::core::backend::BackendClient;
use crate::core::logging::LogManager;
use crate::models::BackendHealth;

#[derive(Deserialize)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

#[tauri::command]
pub fn log_frontend_message(level: LogLevel, message: String, context: Option<String>) {
    let ctx = context.unwrap_or_else(|| "frontend".to_string());
    match level {
        LogLevel::Info => info!(target: "frontend", context = %ctx, "{}", message),
        LogLevel::Warn => warn!(target: "frontend", context = %ctx, "{}", message),
        LogLevel::Error => error!(target: "frontend", context = %ctx, "{}", message),
        LogLevel::Debug => debug!(target: "frontend", context = %ctx, "{}", message),
    }
}

/// Probes the backend. An unreachable backend is reported, never an
/// error, so the UI can show a banner and stay usable.
#[tauri::command]
pub async fn check_backend_health(
    backend: State<'_, Arc<BackendClient>>,
) -> Result<BackendHealth, String> {
    match backend.health().await {
        Ok(detail) => Ok(BackendHealth {
            reachable: true,
            detail: Some(detail),
            error: None,
        }),
        Err(e) => {
            warn!("Backend health check failed: {}", e);
            Ok(BackendHealth {
                reachable: false,
                detail: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[tauri::command]
pub async fn select_download_folder(app: AppHandle) -> Result<Option<String>, String> {
    let picked = tauri::async_runtime::spawn_blocking(move || {
        app.dialog().file().blocking_pick_folder()
    })
    .await
    .map_err(|e| e.to_string())?;

    match picked {
        Some(folder) => {
            let path = folder.into_path().map_err(|e| e.to_string())?;
            Ok(Some(path.to_string_lossy().to_string()))
        }
        None => Ok(None),
    }
}

/// Opens the session folder the backend reported for a finished
/// download in the system file manager.
#[tauri::command]
pub fn open_session_folder(path: String) -> Result<(), String> {
    if !Path::new(&path).exists() {
        return Err(format!("Folder not found: {}", path));
    }

    tauri_plugin_opener::open_path(&path, None::<&str>)
        .map_err(|e| format!("Failed to open folder: {}", e))
}

#[tauri::command]
pub fn open_log_folder() -> Result<(), String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    let log_dir = home.join(".audio2note").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir).map_err(|e| e.to_string())?;
    }

    tauri_plugin_opener::open_path(&log_dir, None::<&str>)
        .map_err(|e| format!("Failed to open log folder: {}", e))
}

#[tauri::command]
pub fn get_config(config: State<'_, Arc<ConfigManager>>) -> AppConfig {
    config.get_config()
}

#[tauri::command]
pub fn set_general_config(
    general: GeneralConfig,
    config: State<'_, Arc<ConfigManager>>,
) -> Result<(), String> {
    config.update_general(general);
    config.save()
}

#[tauri::command]
pub fn save_window_state(
    window: WindowConfig,
    config: State<'_, Arc<ConfigManager>>,
) -> Result<(), String> {
    config.update_window(window);
    config.save()
}

#[tauri::command]
pub fn set_log_level(
    level: String,
    log: State<'_, LogManager>,
    config: State<'_, Arc<ConfigManager>>,
) -> Result<(), String> {
    log.set_level(&level)?;

    let mut general = config.get_config().general;
    general.log_level = level;
    config.update_general(general);
    config.save()
}
