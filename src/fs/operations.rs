use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Create a new directory at the given path.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path)?;
    Ok(())
}

/// Immediate entries of a directory, sorted by path.
pub fn list_dir(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries)
}

/// Delete a file or directory. Directories are removed recursively.
pub fn delete(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Resolve a name collision by appending `_copy`, `_copy2`, etc.
///
/// `exists` decides whether a candidate is taken. Returns `dest` itself when
/// it is free.
pub fn resolve_collision(dest: &Path, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if !exists(dest) {
        return dest.to_path_buf();
    }

    let parent = dest.parent().unwrap_or(Path::new("."));
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = dest.extension().map(|e| e.to_string_lossy().to_string());

    for i in 1..=1000 {
        let suffix = if i == 1 {
            "_copy".to_string()
        } else {
            format!("_copy{}", i)
        };
        let new_name = match &ext {
            Some(e) => format!("{}{}.{}", stem, suffix, e),
            None => format!("{}{}", stem, suffix),
        };
        let candidate = parent.join(&new_name);
        if !exists(&candidate) {
            return candidate;
        }
    }

    // Fallback: should not happen in practice
    dest.to_path_buf()
}

/// Copy a file or a whole directory tree from `src` to exactly `dest`.
///
/// A directory is never copied into its own subtree.
pub fn copy_to(src: &Path, dest: &Path) -> Result<()> {
    if src.is_dir() {
        if dest.starts_with(src) {
            return Err(AppError::InvalidMove {
                from: src.to_path_buf(),
                into: dest.to_path_buf(),
            });
        }
        copy_dir_recursive(src, dest)
    } else {
        fs::copy(src, dest)?;
        Ok(())
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}

/// Move `src` to exactly `dest`.
///
/// Uses `fs::rename` first (fast, same-device). Falls back to copy+delete
/// if rename fails (cross-device).
pub fn move_to(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    copy_to(src, dest)?;
    delete(src)
}

/// Move `src` into `trash_dir`, renaming on collision. Returns the trashed path.
pub fn move_to_trash(src: &Path, trash_dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no filename"))?;
    fs::create_dir_all(trash_dir)?;
    let dest = resolve_collision(&trash_dir.join(name), Path::exists);
    move_to(src, &dest)?;
    Ok(dest)
}
