use std::fs;
use std::path::PathBuf;
use chrono::Local;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

const ARCHIVE_KEEP: usize = 10;

pub struct LogManager {
    // Dropping the guard stops file logging, so it lives here.
    _guard: WorkerGuard,
    reload_handle: reload::Handle<EnvFilter, Registry>,
}

fn log_dir() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".audio2note").join("logs"))
}

/// Moves the previous `latest.log` into `archive/` and prunes old
/// archives. Must run before `LogManager::init` grabs the file.
pub fn rotate_logs() -> Result<(), String> {
    let log_dir = log_dir().ok_or("Could not determine home directory")?;
    let archive_dir = log_dir.join("archive");
    let latest = log_dir.join("latest.log");

    fs::create_dir_all(&archive_dir).map_err(|e| e.to_string())?;

    if latest.exists() {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let archived = archive_dir.join(format!("app-{}.log", stamp));
        if let Err(e) = fs::rename(&latest, &archived) {
            eprintln!("Failed to rotate log file: {}", e);
        }
    }

    prune_archives(&archive_dir).map_err(|e| format!("Archive cleanup failed: {}", e))
}

fn prune_archives(archive_dir: &PathBuf) -> std::io::Result<()> {
    let mut archives: Vec<PathBuf> = fs::read_dir(archive_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    // Names embed the timestamp, so lexical order is age order.
    archives.sort_by(|a, b| b.cmp(a));

    for stale in archives.iter().skip(ARCHIVE_KEEP) {
        if let Err(e) = fs::remove_file(stale) {
            eprintln!("Failed to delete old log {:?}: {}", stale, e);
        }
    }

    Ok(())
}

impl LogManager {
    pub fn init(log_level: &str) -> Self {
        let log_dir = log_dir().expect("Could not determine log directory");
        let latest = log_dir.join("latest.log");

        let file = fs::File::create(&latest).expect("Failed to create latest.log");
        let (writer, guard) = tracing_appender::non_blocking(file);

        let file_layer = fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true);

        let stdout_layer = fmt::layer().pretty().with_writer(std::io::stdout);

        let initial_filter = EnvFilter::try_new(filter_string(log_level))
            .unwrap_or_else(|_| EnvFilter::new(filter_string("info")));
        let (filter_layer, reload_handle) = reload::Layer::new(initial_filter);

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(file_layer)
            .with(stdout_layer)
            .init();

        info!("Logging initialized. Writing to: {:?}", latest);

        Self {
            _guard: guard,
            reload_handle,
        }
    }

    pub fn set_level(&self, level: &str) -> Result<(), String> {
        let filter = EnvFilter::try_new(filter_string(level))
            .map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

        self.reload_handle
            .reload(filter)
            .map_err(|e| format!("Failed to reload log level: {}", e))?;

        info!("Log level changed to: {}", level);
        Ok(())
    }
}

fn filter_string(level: &str) -> String {
    // Silence noisy libraries
    format!("{},tao=error,wry=error,hyper=error,reqwest=warn", level)
}
