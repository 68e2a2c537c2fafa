use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Open a log file for appending, creating its directory if needed
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Level for the file+terminal logger. `RUST_LOG` wins when it is a plain
/// level; module-scoped filters only apply to the stderr-only logger.
fn level_filter(default_filter: &str, rust_log: Option<&str>) -> LevelFilter {
    rust_log
        .and_then(|spec| spec.trim().parse().ok())
        .or_else(|| default_filter.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn init_stderr(default_filter: &str) {
    // A second init (e.g. from tests) is harmless
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}

/// Initialize logging.
///
/// Without a log file, env_logger writes to stderr and honors `RUST_LOG`.
/// With one, output goes to both stderr and the file. Failing to open the
/// file falls back to stderr only.
pub fn init_logging(default_filter: &str, log_file: Option<&Path>) {
    let Some(path) = log_file else {
        init_stderr(default_filter);
        return;
    };

    let file = match open_log_file(path) {
        Ok(file) => file,
        Err(e) => {
            init_stderr(default_filter);
            log::warn!("Failed to open log file {}: {}", path.display(), e);
            return;
        }
    };

    let rust_log = std::env::var("RUST_LOG").ok();
    let level = level_filter(default_filter, rust_log.as_deref());
    let config = simplelog::Config::default();

    let _ = CombinedLogger::init(vec![
        TermLogger::new(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto),
        WriteLogger::new(level, config, file),
    ]);

    log::info!("Logging to {} (level: {})", path.display(), level);
}
