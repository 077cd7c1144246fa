#![cfg_attr(all(not(debug_assertions), target_os = "windows"), windows_subsystem = "windows")]

mod commands;
mod config;
mod core;
mod models;

use std::sync::Arc;
use tauri::{LogicalPosition, LogicalSize, Manager, WindowEvent};
use tracing::{info, warn};

use crate::config::{ConfigManager, WindowConfig};
use crate::core::backend::{BackendClient, DEFAULT_BACKEND_URL};
use crate::core::history::HistoryStore;
use crate::core::logging::LogManager;

fn main() {
    if let Err(e) = crate::core::logging::rotate_logs() {
        eprintln!("Log rotation failed: {}", e);
    }

    let config = Arc::new(ConfigManager::new());
    let log_manager = LogManager::init(&config.get_config().general.log_level);

    let backend_url = config.get_config().general.backend_url;
    let backend = Arc::new(BackendClient::new(&backend_url).unwrap_or_else(|e| {
        warn!("Configured backend address '{}' rejected: {}", backend_url, e);
        BackendClient::new(DEFAULT_BACKEND_URL).expect("default backend address must parse")
    }));

    let history = Arc::new(HistoryStore::open_default());

    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .manage(config.clone())
        .manage(backend.clone())
        .manage(history)
        .manage(log_manager)
        .setup(move |app| {
            if let Some(window) = app.get_webview_window("main") {
                let geometry = config.get_config().window;
                let _ = window.set_size(LogicalSize::new(geometry.width, geometry.height));
                let _ = window.set_position(LogicalPosition::new(geometry.x, geometry.y));
            }

            // Startup probe goes to the log only; the UI runs its own
            // health check once loaded.
            let probe = backend.clone();
            tauri::async_runtime::spawn(async move {
                match probe.health().await {
                    Ok(_) => info!("Backend reachable"),
                    Err(e) => warn!("Backend not reachable at startup: {}", e),
                }
            });

            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::CloseRequested { .. } = event {
                let config = window.state::<Arc<ConfigManager>>();
                if let (Ok(position), Ok(size)) = (window.outer_position(), window.inner_size()) {
                    config.update_window(WindowConfig {
                        width: size.width as f64,
                        height: size.height as f64,
                        x: position.x as f64,
                        y: position.y as f64,
                    });
                    let _ = config.save();
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::downloader::process_video,
            commands::history::get_download_history,
            commands::history::record_download,
            commands::system::check_backend_health,
            commands::system::select_download_folder,
            commands::system::open_session_folder,
            commands::system::open_log_folder,
            commands::system::get_config,
            commands::system::set_general_config,
            commands::system::save_window_state,
            commands::system::set_log_level,
            commands::system::log_frontend_message,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
