use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "tabtree=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Logs go to stderr, or to `log_file` when given. Stdout stays reserved for
/// the rendered tree. The returned guard must be held until exit so buffered
/// file output is flushed.
pub fn init(log_file: Option<&Path>) -> Option<WorkerGuard> {
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name()?;
            if std::fs::create_dir_all(dir).is_err() {
                return None;
            }

            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let subscriber = tracing_subscriber::registry().with(env_filter()).with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            );
            subscriber.try_init().ok()?;
            tracing::info!(log_file = %path.display(), "tracing initialized");
            Some(guard)
        }
        None => {
            let subscriber = tracing_subscriber::registry().with(env_filter()).with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            );
            if subscriber.try_init().is_ok() {
                tracing::debug!("tracing initialized");
            }
            None
        }
    }
}
