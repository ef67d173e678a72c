use crate::app::config::LoggingConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle, Naming,
};
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "shopfront";

/// Initialize the file logger. The returned handle must stay alive for the
/// lifetime of the program or buffered lines are lost.
pub fn init_logger(config: &LoggingConfig) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = config.level_filter();
    let directory = log_directory(config);

    let mut logger = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(&directory)
                .basename(LOG_BASENAME)
                .suppress_timestamp(),
        )
        .format_for_files(custom_log_format)
        .use_utc();

    if config.append_to_file {
        logger = logger.append();
    }

    if config.rotate_logs {
        logger = logger.rotate(
            Criterion::Size(config.rotation_size_mb * 1024 * 1024),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(config.keep_log_files as usize),
        );
    }

    if config.log_to_console {
        logger = logger.log_to_stdout();
    }

    let handle = logger.start()?;
    log::info!("Logger initialized with level: {}", level);
    log::info!("Log file location: {}", log_file_path(config).display());

    Ok(handle)
}

/// Directory for log files: `custom_log_path` if set, otherwise platform-specific
pub fn log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(custom) = &config.custom_log_path {
        return custom.clone();
    }
    default_log_directory()
}

fn default_log_directory() -> PathBuf {
    #[cfg(target_os = "macos")]
    return dirs::home_dir()
        .map(|h| h.join("Library/Logs/shopfront"))
        .unwrap_or_else(|| PathBuf::from("./logs"));

    #[cfg(not(target_os = "macos"))]
    return dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
        .map(|d| d.join("shopfront/logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"));
}

/// Full path of the main log file
pub fn log_file_path(config: &LoggingConfig) -> PathBuf {
    log_directory(config).join(format!("{}.log", LOG_BASENAME))
}

/// Custom log format for file output
fn custom_log_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] [{}:{}] {}",
        now.now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Ensure log directory exists
pub fn ensure_log_directory(config: &LoggingConfig) -> color_eyre::Result<()> {
    let log_dir = log_directory(config);
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }
    Ok(())
}

pub fn log_startup_info(config: &LoggingConfig) {
    log::info!("=== Shopfront Starting ===");
    log::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    log::info!("OS: {}", std::env::consts::OS);
    log::info!("Architecture: {}", std::env::consts::ARCH);
    log::info!("Log file: {}", log_file_path(config).display());
}

pub fn log_shutdown_info() {
    log::info!("=== Shopfront Shutting Down ===");
}

/// Log user interactions for debugging
pub fn log_user_interaction(action: &str, context: Option<&str>) {
    match context {
        Some(ctx) => log::debug!("User action: {} - {}", action, ctx),
        None => log::debug!("User action: {}", action),
    }
}

pub fn log_config_loading(config_path: &Path, created: bool) {
    if created {
        log::info!("Created default config file at: {}", config_path.display());
    } else {
        log::info!("Loaded config file from: {}", config_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_log_path_wins() {
        let config = LoggingConfig {
            custom_log_path: Some(PathBuf::from("/tmp/shopfront-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(log_directory(&config), PathBuf::from("/tmp/shopfront-logs"));
        assert_eq!(
            log_file_path(&config),
            PathBuf::from("/tmp/shopfront-logs/shopfront.log")
        );
    }

    #[test]
    fn test_ensure_log_directory_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            custom_log_path: Some(dir.path().join("a").join("b")),
            ..LoggingConfig::default()
        };
        ensure_log_directory(&config).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
