//! JSON session files describing the editor's open tabs.
//!
//! ```json
//! { "roots": ["/ws"], "active": "/ws/src/main.rs",
//!   "tabs": [{ "path": "/ws/src/main.rs", "preview": false, "dirty": true, "group": 0 }] }
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::host::{HostEvent, WorkspaceSnapshot};

/// Parse a session document. Empty `roots` fall back to `default_roots`.
pub fn parse(text: &str, default_roots: &[PathBuf]) -> Result<WorkspaceSnapshot> {
    let mut snapshot: WorkspaceSnapshot = serde_json::from_str(text)?;
    if snapshot.roots.is_empty() {
        snapshot.roots = default_roots.to_vec();
    }
    Ok(snapshot)
}

/// Read and parse the session file at `path`.
pub fn load(path: &Path, default_roots: &[PathBuf]) -> Result<WorkspaceSnapshot> {
    let text = std::fs::read_to_string(path)?;
    let snapshot = parse(&text, default_roots)?;
    debug!(
        path = %path.display(),
        tabs = snapshot.tabs.len(),
        roots = snapshot.roots.len(),
        "session loaded"
    );
    Ok(snapshot)
}

/// Host events that turn `old` into `new`.
pub fn changes(old: &WorkspaceSnapshot, new: &WorkspaceSnapshot) -> Vec<HostEvent> {
    let mut events = Vec::new();
    if old.tabs != new.tabs || old.roots != new.roots {
        events.push(HostEvent::TabsChanged);
    }
    if old.active != new.active {
        events.push(HostEvent::ActiveEditorChanged);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::host::OpenTab;

    #[test]
    fn test_parses_full_document() {
        let text = r#"{
            "roots": ["/ws"],
            "active": "/ws/a.rs",
            "tabs": [
                { "path": "/ws/a.rs", "dirty": true, "group": 1 },
                { "path": "/ws/b.rs", "preview": true }
            ]
        }"#;
        let snap = parse(text, &[]).unwrap();
        assert_eq!(snap.roots, vec![PathBuf::from("/ws")]);
        assert_eq!(snap.active, Some(PathBuf::from("/ws/a.rs")));
        assert_eq!(snap.tabs.len(), 2);
        assert!(snap.tabs[0].dirty);
        assert_eq!(snap.tabs[0].group, Some(1));
        assert!(snap.tabs[1].preview);
        assert!(!snap.tabs[1].dirty);
    }

    #[test]
    fn test_missing_roots_use_defaults() {
        let snap = parse(r#"{ "tabs": [] }"#, &[PathBuf::from("/fallback")]).unwrap();
        assert_eq!(snap.roots, vec![PathBuf::from("/fallback")]);
        assert_eq!(snap.active, None);
    }

    #[test]
    fn test_session_roots_win_over_defaults() {
        let snap = parse(r#"{ "roots": ["/ws"] }"#, &[PathBuf::from("/fallback")]).unwrap();
        assert_eq!(snap.roots, vec![PathBuf::from("/ws")]);
    }

    #[test]
    fn test_malformed_json_is_a_session_error() {
        assert!(matches!(parse("{ tabs: ", &[]), Err(AppError::Session(_))));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{ "tabs": [{ "path": "/ws/x.md" }] }"#).unwrap();
        let snap = load(&path, &[]).unwrap();
        assert_eq!(snap.tabs, vec![OpenTab::new("/ws/x.md")]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json"), &[]).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_changes_between_snapshots() {
        let mut old = WorkspaceSnapshot::new(vec![PathBuf::from("/ws")]);
        old.open("/ws/a.rs");
        let same = old.clone();
        assert!(changes(&old, &same).is_empty());

        let mut switched = old.clone();
        switched.open("/ws/b.rs");
        assert_eq!(
            changes(&old, &switched),
            vec![HostEvent::TabsChanged, HostEvent::ActiveEditorChanged]
        );

        let mut dirtied = old.clone();
        dirtied.tabs[0].dirty = true;
        assert_eq!(changes(&old, &dirtied), vec![HostEvent::TabsChanged]);
    }
}
