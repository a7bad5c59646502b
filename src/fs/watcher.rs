use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::Watcher;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::Result;
use crate::event::Event;

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Watches the session file and forwards changes as `Event::SessionChanged`.
pub struct SessionWatcher {
    /// Handle to the debouncer (dropped to stop watching).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl SessionWatcher {
    /// Watch `session`. Its parent directory is watched so that editors
    /// replacing the file through a rename are still seen.
    pub fn new(
        session: &Path,
        debounce_duration: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> Result<Self> {
        let dir = session
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let target = session.to_path_buf();

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let paths: Vec<PathBuf> = events
                        .into_iter()
                        .filter(|e| e.kind == DebouncedEventKind::Any)
                        .map(|e| e.path)
                        .collect();
                    if touches_session(&paths, &target) {
                        let _ = event_tx.send(Event::SessionChanged);
                    }
                }
                Err(e) => warn!(error = %e, "session watcher error"),
            },
        )?;

        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Whether any changed path refers to the session file (by file name).
pub fn touches_session(paths: &[PathBuf], session: &Path) -> bool {
    let Some(name) = session.file_name() else {
        return false;
    };
    paths.iter().any(|p| p.file_name() == Some(name))
}
