//! File-system primitives used by the command surface.

pub mod clipboard;
pub mod operations;
pub mod watcher;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AppConfig;
use crate::error::Result;

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// File-system primitives provided by the host.
pub trait FileSystem {
    fn create_dir(&self, path: &Path) -> Result<()>;
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    /// Copy a file or directory tree to exactly `to`.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn delete(&self, path: &Path, use_trash: bool) -> Result<()>;
    /// `None` when nothing exists at `path`.
    fn stat(&self, path: &Path) -> Option<EntryKind>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_some()
    }
}

/// `FileSystem` backed by the local disk.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    trash_dir: PathBuf,
}

impl LocalFileSystem {
    pub fn new(trash_dir: PathBuf) -> Self {
        Self { trash_dir }
    }

    /// Local file system trashing into the configured directory.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.trash_dir())
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }
}

impl FileSystem for LocalFileSystem {
    fn create_dir(&self, path: &Path) -> Result<()> {
        operations::create_dir(path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        operations::list_dir(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        operations::copy_to(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        operations::move_to(from, to)
    }

    fn delete(&self, path: &Path, use_trash: bool) -> Result<()> {
        if use_trash {
            let trashed = operations::move_to_trash(path, &self.trash_dir)?;
            debug!(from = %path.display(), to = %trashed.display(), "moved to trash");
            Ok(())
        } else {
            operations::delete(path)
        }
    }

    fn stat(&self, path: &Path) -> Option<EntryKind> {
        let metadata = std::fs::symlink_metadata(path).ok()?;
        Some(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn local(tmp: &TempDir) -> LocalFileSystem {
        LocalFileSystem::new(tmp.path().join(".trash"))
    }

    #[test]
    fn test_stat_distinguishes_files_and_dirs() {
        let tmp = TempDir::new().unwrap();
        let fs = local(&tmp);
        fs.write(&tmp.path().join("f.txt"), b"x").unwrap();
        fs.create_dir(&tmp.path().join("d")).unwrap();
        assert_eq!(fs.stat(&tmp.path().join("f.txt")), Some(EntryKind::File));
        assert_eq!(fs.stat(&tmp.path().join("d")), Some(EntryKind::Directory));
        assert_eq!(fs.stat(&tmp.path().join("missing")), None);
        assert!(!fs.exists(&tmp.path().join("missing")));
    }

    #[test]
    fn test_delete_with_trash_keeps_a_copy() {
        let tmp = TempDir::new().unwrap();
        let fs = local(&tmp);
        let target = tmp.path().join("gone.txt");
        fs.write(&target, b"bye").unwrap();
        fs.delete(&target, true).unwrap();
        assert!(!target.exists());
        assert_eq!(
            std::fs::read_to_string(fs.trash_dir().join("gone.txt")).unwrap(),
            "bye"
        );
    }

    #[test]
    fn test_delete_without_trash_is_permanent() {
        let tmp = TempDir::new().unwrap();
        let fs = local(&tmp);
        let target = tmp.path().join("gone");
        fs.create_dir(&target).unwrap();
        fs.delete(&target, false).unwrap();
        assert!(!target.exists());
        assert!(!fs.trash_dir().exists());
    }

    #[test]
    fn test_trash_dir_comes_from_config() {
        let tmp = TempDir::new().unwrap();
        let trash = tmp.path().join("bin");
        let config: AppConfig =
            toml::from_str(&format!("[general]\ntrash_dir = {:?}\n", trash.display().to_string()))
                .unwrap();
        let fs = LocalFileSystem::from_config(&config);
        assert_eq!(fs.trash_dir(), trash.as_path());

        let target = tmp.path().join("old.txt");
        fs.write(&target, b"x").unwrap();
        fs.delete(&target, true).unwrap();
        assert!(trash.join("old.txt").is_file());
    }

    #[test]
    fn test_rename_then_list() {
        let tmp = TempDir::new().unwrap();
        let fs = local(&tmp);
        let from = tmp.path().join("a.txt");
        let to = tmp.path().join("b.txt");
        fs.write(&from, b"").unwrap();
        fs.rename(&from, &to).unwrap();
        assert_eq!(fs.list_dir(tmp.path()).unwrap(), vec![to]);
    }
}
