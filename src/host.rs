//! Interfaces the embedding editor provides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::tree::{Forest, TreeNode};

/// One open editor tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenTab {
    pub path: PathBuf,
    /// Transient tab that has not been pinned yet.
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default)]
    pub group: Option<usize>,
}

impl OpenTab {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            preview: false,
            dirty: false,
            group: None,
        }
    }

    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// Change notifications delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ActiveEditorChanged,
    DocumentOpened,
    TabsChanged,
    TabGroupsChanged,
    WindowFocusChanged(bool),
    ViewColumnChanged,
    VisibleEditorsChanged,
    /// The open-tabs view itself was shown or hidden.
    ViewVisibilityChanged(bool),
}

/// Tab enumeration and workspace roots.
pub trait Workspace {
    fn open_tabs(&self) -> Vec<OpenTab>;
    fn active_file(&self) -> Option<PathBuf>;
    fn roots(&self) -> Vec<PathBuf>;
}

/// How a reveal should affect the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealOptions {
    pub select: bool,
    pub expand: bool,
    pub focus: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            select: true,
            expand: true,
            focus: false,
        }
    }
}

/// The tree widget inside the host sidebar.
pub trait TreeView {
    /// Fired after every sync rebuild.
    fn tree_changed(&mut self, forest: &Forest);
    fn reveal(&mut self, node: &TreeNode, options: RevealOptions);
}

/// Editor-level services used by commands.
pub trait Workbench {
    fn open_file(&mut self, path: &Path, preview: bool);
    fn close_file(&mut self, path: &Path);
    fn close_all(&mut self);
    fn compare(&mut self, left: &Path, right: &Path);
    fn reveal_in_os(&mut self, path: &Path);
    fn open_terminal(&mut self, dir: &Path);
    fn write_clipboard(&mut self, text: &str);
    /// Ask the user for a line of text; `None` when dismissed.
    fn prompt(&mut self, message: &str, initial: &str) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
    fn show_error(&mut self, message: &str);
}

/// Owned, in-memory workspace state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    #[serde(default)]
    pub active: Option<PathBuf>,
    #[serde(default)]
    pub tabs: Vec<OpenTab>,
}

impl WorkspaceSnapshot {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ..Default::default()
        }
    }

    /// Open `path` as the active tab.
    pub fn open(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.tabs.iter().any(|t| t.path == path) {
            self.tabs.push(OpenTab::new(path.clone()));
        }
        self.active = Some(path);
    }

    /// Close every tab on `path`.
    pub fn close(&mut self, path: &Path) {
        self.tabs.retain(|t| t.path != path);
        if self.active.as_deref() == Some(path) {
            self.active = self.tabs.last().map(|t| t.path.clone());
        }
    }
}

impl Workspace for WorkspaceSnapshot {
    fn open_tabs(&self) -> Vec<OpenTab> {
        self.tabs.clone()
    }

    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    fn roots(&self) -> Vec<PathBuf> {
        self.roots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_defaults_do_not_steal_focus() {
        let opts = RevealOptions::default();
        assert!(opts.select);
        assert!(opts.expand);
        assert!(!opts.focus);
    }

    #[test]
    fn test_snapshot_open_and_close() {
        let mut ws = WorkspaceSnapshot::new(vec![PathBuf::from("/ws")]);
        ws.open("/ws/a.rs");
        ws.open("/ws/b.rs");
        ws.open("/ws/a.rs");
        assert_eq!(ws.open_tabs().len(), 2);
        assert_eq!(ws.active_file(), Some(PathBuf::from("/ws/a.rs")));

        ws.close(Path::new("/ws/a.rs"));
        assert_eq!(ws.open_tabs().len(), 1);
        assert_eq!(ws.active_file(), Some(PathBuf::from("/ws/b.rs")));
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let json = r#"{ "tabs": [ { "path": "/ws/x.rs", "preview": true } ] }"#;
        let ws: WorkspaceSnapshot = serde_json::from_str(json).unwrap();
        assert!(ws.roots.is_empty());
        assert_eq!(ws.active, None);
        assert_eq!(ws.tabs.len(), 1);
        assert!(ws.tabs[0].preview);
        assert!(!ws.tabs[0].dirty);
    }
}
