use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

use crate::core::backend::DEFAULT_BACKEND_URL;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            x: 100.0,
            y: 100.0,
        }
    }
}

impl WindowConfig {
    /// Resets coordinates persisted while minimized (e.g. -32000 on
    /// Windows) and implausibly small dimensions.
    pub fn sanitize(&mut self) {
        if self.x <= -10000.0 || self.y <= -10000.0 {
            self.x = 100.0;
            self.y = 100.0;
        }

        if self.width < 400.0 {
            self.width = 1200.0;
        }
        if self.height < 300.0 {
            self.height = 800.0;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub backend_url: String,
    pub download_path: Option<String>,
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            download_path: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub window: WindowConfig,
}

pub struct ConfigManager {
    config: Mutex<AppConfig>,
    file_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        let config_dir = home.join(".audio2note");

        if !config_dir.exists() {
            let _ = fs::create_dir_all(&config_dir);
        }

        Self::with_path(config_dir.join("config.json"))
    }

    pub fn with_path(file_path: PathBuf) -> Self {
        let mut config = Self::read_config(&file_path)
            .or_else(|| Self::read_config(&file_path.with_extension("json.bak")))
            .unwrap_or_default();

        config.window.sanitize();

        let manager = Self {
            config: Mutex::new(config),
            file_path,
        };

        // Rewrite immediately so partial or legacy files get upgraded
        // to the current shape.
        let _ = manager.save();
        manager
    }

    /// Same liberal policy as the history snapshot: unreadable or
    /// unparseable config means "use defaults", never a startup error.
    fn read_config(path: &PathBuf) -> Option<AppConfig> {
        if !path.exists() {
            return None;
        }

        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Discarding malformed config {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let config = self.config.lock().unwrap();

        let json = serde_json::to_string_pretty(&*config)
            .map_err(|e| format!("Serialization error: {}", e))?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        let bak_path = self.file_path.with_extension("json.bak");

        fs::write(&tmp_path, json).map_err(|e| format!("Failed to write temp config: {}", e))?;

        if self.file_path.exists() {
            let _ = fs::copy(&self.file_path, &bak_path);
        }

        fs::rename(&tmp_path, &self.file_path)
            .map_err(|e| format!("Failed to commit config file: {}", e))?;

        Ok(())
    }

    pub fn get_config(&self) -> AppConfig {
        self.config.lock().unwrap().clone()
    }

    pub fn update_general(&self, general: GeneralConfig) {
        let mut config = self.config.lock().unwrap();
        config.general = general;
    }

    pub fn update_window(&self, mut window: WindowConfig) {
        window.sanitize();
        let mut config = self.config.lock().unwrap();
        config.window = window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let config = manager.get_config();
        assert_eq!(config.general.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "###").unwrap();

        let manager = ConfigManager::with_path(path);
        assert_eq!(manager.get_config().general.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn updates_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        {
            let manager = ConfigManager::with_path(path.clone());
            manager.update_general(GeneralConfig {
                backend_url: "http://localhost:9999".into(),
                download_path: Some("/tmp/videos".into()),
                log_level: "debug".into(),
            });
            manager.save().unwrap();
        }

        let reloaded = ConfigManager::with_path(path);
        let general = reloaded.get_config().general;
        assert_eq!(general.backend_url, "http://localhost:9999");
        assert_eq!(general.download_path.as_deref(), Some("/tmp/videos"));
        assert_eq!(general.log_level, "debug");
    }

    #[test]
    fn window_sanitize_fixes_minimized_coordinates() {
        let mut window = WindowConfig {
            width: 100.0,
            height: 100.0,
            x: -32000.0,
            y: -32000.0,
        };
        window.sanitize();

        assert_eq!(window.x, 100.0);
        assert_eq!(window.y, 100.0);
        assert_eq!(window.width, 1200.0);
        assert_eq!(window.height, 800.0);
    }
}
