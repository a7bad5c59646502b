//! User-invoked commands on tree nodes.
//!
//! File-system work goes through [`FileSystem`]; everything else is handed to
//! the host [`Workbench`]. Commands that touch the disk request a sync
//! afterwards, whether they succeeded or not. Failures are shown to the user
//! with the underlying message and leave the tree as last built.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::fs::clipboard::{ClipboardOp, ClipboardState};
use crate::fs::operations::resolve_collision;
use crate::fs::{EntryKind, FileSystem};
use crate::host::{TreeView, Workbench, Workspace};
use crate::sync::SyncController;
use crate::tree::node::display_name;
use crate::tree::{NodeId, NodeKind};

/// A command plus the node(s) it was invoked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(NodeId),
    Close(NodeId),
    CloseAll,
    Refresh,
    Rename(NodeId),
    Delete(Vec<NodeId>),
    Duplicate(NodeId),
    Cut(Vec<NodeId>),
    Copy(Vec<NodeId>),
    /// Paste into the node's directory, or the first root when `None`.
    Paste(Option<NodeId>),
    NewFile(Option<NodeId>),
    NewFolder(Option<NodeId>),
    CompareSelected(Vec<NodeId>),
    RevealInOs(NodeId),
    OpenInTerminal(NodeId),
    CopyPath(Vec<NodeId>),
    CopyRelativePath(Vec<NodeId>),
    /// Drag-and-drop of `sources` onto `target` (the first root when `None`).
    Move {
        sources: Vec<NodeId>,
        target: Option<NodeId>,
    },
}

impl Command {
    /// Whether the command may change the disk.
    pub fn mutates_files(&self) -> bool {
        matches!(
            self,
            Command::Rename(_)
                | Command::Delete(_)
                | Command::Duplicate(_)
                | Command::Paste(_)
                | Command::NewFile(_)
                | Command::NewFolder(_)
                | Command::Move { .. }
        )
    }
}

/// Behavior switches taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    pub confirm_delete: bool,
    pub use_trash: bool,
}

impl From<&AppConfig> for CommandOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            confirm_delete: config.confirm_delete(),
            use_trash: config.use_trash(),
        }
    }
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            use_trash: true,
        }
    }
}

/// Runs commands against the host file system and workbench.
pub struct CommandRunner<F: FileSystem, B: Workbench> {
    fs: F,
    bench: B,
    clipboard: ClipboardState,
    options: CommandOptions,
}

impl<F: FileSystem, B: Workbench> CommandRunner<F, B> {
    pub fn new(fs: F, bench: B, options: CommandOptions) -> Self {
        Self {
            fs,
            bench,
            clipboard: ClipboardState::new(),
            options,
        }
    }

    pub fn bench(&self) -> &B {
        &self.bench
    }

    pub fn bench_mut(&mut self) -> &mut B {
        &mut self.bench
    }

    pub fn clipboard(&self) -> &ClipboardState {
        &self.clipboard
    }

    /// Run `command`, report any failure to the user, and resync if needed.
    ///
    /// Returns whether the command succeeded.
    pub fn execute<W: Workspace, V: TreeView>(
        &mut self,
        command: Command,
        sync: &mut SyncController<W, V>,
        now: Instant,
    ) -> bool {
        let mutates = command.mutates_files();
        let result = self.run(command, sync, now);
        if mutates {
            sync.invalidate();
            sync.request_sync(now);
        }
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "command failed");
                self.bench.show_error(&e.to_string());
                false
            }
        }
    }

    /// Run `command` without reporting or resyncing.
    pub fn run<W: Workspace, V: TreeView>(
        &mut self,
        command: Command,
        sync: &mut SyncController<W, V>,
        now: Instant,
    ) -> Result<()> {
        debug!(?command, "running command");
        match command {
            Command::Open(id) => {
                if id.is_folder() {
                    return Err(AppError::InvalidSelection("cannot open a folder".into()));
                }
                self.bench.open_file(&id.path, false);
                Ok(())
            }
            Command::Close(id) => {
                match id.kind {
                    NodeKind::File => self.bench.close_file(&id.path),
                    NodeKind::Folder => {
                        for file in sync.forest().files_under(&id) {
                            self.bench.close_file(&file);
                        }
                    }
                }
                Ok(())
            }
            Command::CloseAll => {
                self.bench.close_all();
                Ok(())
            }
            Command::Refresh => {
                sync.invalidate();
                sync.request_sync(now);
                Ok(())
            }
            Command::Rename(id) => self.rename(&id),
            Command::Delete(ids) => self.delete(&ids),
            Command::Duplicate(id) => self.duplicate(&id),
            Command::Cut(ids) => {
                self.clipboard.set(paths_of(&ids), ClipboardOp::Cut);
                Ok(())
            }
            Command::Copy(ids) => {
                self.clipboard.set(paths_of(&ids), ClipboardOp::Copy);
                Ok(())
            }
            Command::Paste(target) => {
                let dir = target_dir(target.as_ref(), sync)?;
                self.paste(&dir)
            }
            Command::NewFile(target) => {
                let dir = target_dir(target.as_ref(), sync)?;
                self.create(&dir, EntryKind::File)
            }
            Command::NewFolder(target) => {
                let dir = target_dir(target.as_ref(), sync)?;
                self.create(&dir, EntryKind::Directory)
            }
            Command::CompareSelected(ids) => match ids.as_slice() {
                [left, right] if !left.is_folder() && !right.is_folder() => {
                    self.bench.compare(&left.path, &right.path);
                    Ok(())
                }
                _ => Err(AppError::InvalidSelection(
                    "select exactly two files to compare".into(),
                )),
            },
            Command::RevealInOs(id) => {
                self.bench.reveal_in_os(&id.path);
                Ok(())
            }
            Command::OpenInTerminal(id) => {
                let dir = own_dir(&id)?;
                self.bench.open_terminal(&dir);
                Ok(())
            }
            Command::CopyPath(ids) => {
                let text = join_lines(ids.iter().map(|id| id.path.clone()));
                self.bench.write_clipboard(&text);
                Ok(())
            }
            Command::CopyRelativePath(ids) => {
                let classifier = sync.classifier();
                let text = join_lines(ids.iter().map(|id| {
                    classifier
                        .relative_path(&id.path)
                        .unwrap_or(&id.path)
                        .to_path_buf()
                }));
                self.bench.write_clipboard(&text);
                Ok(())
            }
            Command::Move { sources, target } => {
                let dir = target_dir(target.as_ref(), sync)?;
                self.move_into(&sources, &dir)
            }
        }
    }

    fn rename(&mut self, id: &NodeId) -> Result<()> {
        let parent = own_parent(id)?;
        let current = display_name(&id.path);
        let Some(input) = self.bench.prompt("New name", &current) else {
            return Ok(());
        };
        let name = input.trim();
        if name.is_empty() || name == current {
            return Ok(());
        }
        validate_name(name)?;

        let dest = parent.join(name);
        if self.fs.exists(&dest) {
            return Err(AppError::AlreadyExists(dest));
        }
        self.fs.rename(&id.path, &dest)
    }

    fn delete(&mut self, ids: &[NodeId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        if self.options.confirm_delete {
            let what = match ids {
                [one] if one.is_folder() => {
                    let entries = self.fs.list_dir(&one.path)?.len();
                    format!("'{}' and its {} entries", display_name(&one.path), entries)
                }
                [one] => format!("'{}'", display_name(&one.path)),
                many => format!("{} items", many.len()),
            };
            let message = if self.options.use_trash {
                format!("Move {} to the trash?", what)
            } else {
                format!("Permanently delete {}?", what)
            };
            if !self.bench.confirm(&message) {
                return Ok(());
            }
        }
        for id in ids {
            self.fs.delete(&id.path, self.options.use_trash)?;
        }
        let stale = self
            .clipboard
            .paths()
            .iter()
            .any(|p| ids.iter().any(|id| p.starts_with(&id.path)));
        if stale {
            self.clipboard.clear();
        }
        Ok(())
    }

    fn duplicate(&mut self, id: &NodeId) -> Result<()> {
        let dest = resolve_collision(&id.path, |p| self.fs.exists(p));
        self.fs.copy(&id.path, &dest)?;
        if !id.is_folder() {
            self.bench.open_file(&dest, false);
        }
        Ok(())
    }

    fn paste(&mut self, dir: &Path) -> Result<()> {
        let Some((paths, op)) = self.clipboard.take_for_paste() else {
            return Err(AppError::InvalidSelection("clipboard is empty".into()));
        };
        for src in paths {
            let kind = match self.fs.stat(&src) {
                Some(EntryKind::Directory) => NodeKind::Folder,
                _ => NodeKind::File,
            };
            let src = NodeId { path: src, kind };
            match op {
                ClipboardOp::Copy => {
                    check_move(&src, dir)?;
                    let name = file_name(&src.path)?;
                    let dest = resolve_collision(&dir.join(name), |p| self.fs.exists(p));
                    self.fs.copy(&src.path, &dest)?;
                }
                ClipboardOp::Cut => self.move_one(&src, dir)?,
            }
        }
        Ok(())
    }

    fn create(&mut self, dir: &Path, kind: EntryKind) -> Result<()> {
        let message = match kind {
            EntryKind::File => "New file name",
            EntryKind::Directory => "New folder name",
        };
        let Some(input) = self.bench.prompt(message, "") else {
            return Ok(());
        };
        let name = input.trim();
        if name.is_empty() {
            return Ok(());
        }
        validate_name(name)?;

        let dest = dir.join(name);
        if self.fs.exists(&dest) {
            return Err(AppError::AlreadyExists(dest));
        }
        match kind {
            EntryKind::File => {
                self.fs.write(&dest, b"")?;
                self.bench.open_file(&dest, false);
            }
            EntryKind::Directory => self.fs.create_dir(&dest)?,
        }
        Ok(())
    }

    fn move_into(&mut self, sources: &[NodeId], dir: &Path) -> Result<()> {
        if sources.is_empty() {
            return Err(AppError::InvalidSelection("nothing to move".into()));
        }
        for src in sources {
            self.move_one(src, dir)?;
        }
        Ok(())
    }

    fn move_one(&mut self, src: &NodeId, dir: &Path) -> Result<()> {
        check_move(src, dir)?;
        if src.parent_path() == Some(dir) {
            debug!(path = %src.path.display(), "already in target directory");
            return Ok(());
        }
        let dest = dir.join(file_name(&src.path)?);
        if self.fs.exists(&dest) {
            return Err(AppError::AlreadyExists(dest));
        }
        self.fs.rename(&src.path, &dest)
    }
}

/// Refuse to move or copy a folder onto itself or into one of its descendants.
///
/// Containment is per path component: `/a/foo` does not contain `/a/foobar`.
pub fn check_move(src: &NodeId, dir: &Path) -> Result<()> {
    if src.is_folder() && dir.starts_with(&src.path) {
        return Err(AppError::InvalidMove {
            from: src.path.clone(),
            into: dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Directory a command targets: the folder itself, a file's parent, or the
/// first workspace root.
fn target_dir<W: Workspace, V: TreeView>(
    target: Option<&NodeId>,
    sync: &SyncController<W, V>,
) -> Result<PathBuf> {
    match target {
        Some(id) => own_dir(id),
        None => sync
            .workspace()
            .roots()
            .into_iter()
            .next()
            .ok_or_else(|| AppError::InvalidSelection("no workspace folder is open".into())),
    }
}

fn own_dir(id: &NodeId) -> Result<PathBuf> {
    match id.kind {
        NodeKind::Folder => Ok(id.path.clone()),
        NodeKind::File => own_parent(id),
    }
}

fn own_parent(id: &NodeId) -> Result<PathBuf> {
    id.parent_path()
        .map(Path::to_path_buf)
        .ok_or_else(|| AppError::InvalidPath(id.path.display().to_string()))
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| AppError::InvalidPath(path.display().to_string()))
}

fn validate_name(name: &str) -> Result<()> {
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(AppError::InvalidPath(name.to_string()));
    }
    Ok(())
}

fn paths_of(ids: &[NodeId]) -> Vec<PathBuf> {
    ids.iter().map(|id| id.path.clone()).collect()
}

fn join_lines(paths: impl Iterator<Item = PathBuf>) -> String {
    paths
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
