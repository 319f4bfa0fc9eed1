use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Name of the log file created in the log directory.
pub const LOG_FILE_NAME: &str = "mazegen.log";

/// Installs a global subscriber writing plain-text logs to
/// `dir/mazegen.log`, so they never interfere with the terminal display.
///
/// Logs are flushed until the returned guard is dropped, so keep it alive
/// for as long as the program runs.
pub fn init_logging(dir: &Path, level: tracing::Level) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .with_target(false)
        .init();
    guard
}
