//! Logging setup driven by the `[logging]` config section

use forge_core::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const LOG_FILE_PREFIX: &str = "screenforge.log";

/// Parse log level from config string
fn parse_log_level(level: &str) -> LevelFilter {
  match level.trim().to_lowercase().as_str() {
    "off" => LevelFilter::OFF,
    "error" => LevelFilter::ERROR,
    "warn" | "warning" => LevelFilter::WARN,
    "info" => LevelFilter::INFO,
    "debug" => LevelFilter::DEBUG,
    "trace" => LevelFilter::TRACE,
    _ => LevelFilter::INFO,
  }
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(parse_log_level(&config.level).into())
    .from_env_lossy()
}

/// Initialize logging.
///
/// Without `logging.file` events go to stderr so stdout stays clean for
/// `--json` output. With it they go to a rolling file (no ANSI).
///
/// Returns the guard that must be kept alive for the duration of the program
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
  let Some(file) = &config.file else {
    init_stderr(config);
    return None;
  };

  let dir = file
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .map(|p| p.to_path_buf())
    .unwrap_or_else(|| std::path::PathBuf::from("."));
  let prefix = file
    .file_name()
    .and_then(|n| n.to_str())
    .unwrap_or(LOG_FILE_PREFIX)
    .to_string();

  if std::fs::create_dir_all(&dir).is_err() {
    init_stderr(config);
    return None;
  }

  let file_appender = match config.rotation.as_str() {
    "hourly" => tracing_appender::rolling::hourly(&dir, &prefix),
    "never" => tracing_appender::rolling::never(&dir, &prefix),
    _ => tracing_appender::rolling::daily(&dir, &prefix),
  };
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter(config))
    .with_target(true)
    .with_ansi(false)
    .with_writer(file_writer)
    .init();

  Some(guard)
}

fn init_stderr(config: &LoggingConfig) {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter(config))
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}
