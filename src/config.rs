//! Configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--root`, `--reveal-delay-ms`, ...)
//! 2. `$TABTREE_CONFIG` environment variable (path to config file)
//! 3. Project-local `.tabtree.toml` in the current working directory
//! 4. Global `~/.config/tabtree/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::fs::watcher::DEFAULT_DEBOUNCE_MS;
use crate::sync::DEFAULT_REVEAL_DELAY_MS;

// ── Section configs ──────────────────────────────────────────────────────────

/// File command behavior.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Ask before deleting.
    pub confirm_delete: Option<bool>,
    /// Move deleted items to the trash directory instead of removing them.
    pub use_trash: Option<bool>,
    /// Where trashed items go.
    pub trash_dir: Option<String>,
}

/// Workspace roots used when the host does not provide any.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub roots: Option<Vec<String>>,
}

/// Sync controller timing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay between a rebuild and the reveal of the active file.
    pub reveal_delay_ms: Option<u64>,
}

/// Session file watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    pub enabled: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub workspace: WorkspaceConfig,
    pub sync: SyncConfig,
    pub watcher: WatcherConfig,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config files in priority order, excluding `--config`.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("TABTREE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".tabtree.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tabtree").join("config.toml"));
    }

    paths
}

/// Read and parse a TOML config file. Returns `None` if the file is missing
/// or unparseable (the latter with a warning).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
                use_trash: other.general.use_trash.or(self.general.use_trash),
                trash_dir: other.general.trash_dir.clone().or(self.general.trash_dir),
            },
            workspace: WorkspaceConfig {
                roots: other.workspace.roots.clone().or(self.workspace.roots),
            },
            sync: SyncConfig {
                reveal_delay_ms: other.sync.reveal_delay_ms.or(self.sync.reveal_delay_ms),
            },
            watcher: WatcherConfig {
                enabled: other.watcher.enabled.or(self.watcher.enabled),
                debounce_ms: other.watcher.debounce_ms.or(self.watcher.debounce_ms),
            },
        }
    }

    /// Load the final merged configuration.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher sources overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    pub fn use_trash(&self) -> bool {
        self.general.use_trash.unwrap_or(true)
    }

    /// Trash directory, defaulting to the per-user data directory.
    pub fn trash_dir(&self) -> PathBuf {
        match &self.general.trash_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("tabtree")
                .join("trash"),
        }
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.workspace
            .roots
            .as_ref()
            .map(|roots| roots.iter().map(PathBuf::from).collect())
            .unwrap_or_default()
    }

    /// Configured roots resolved against the current directory, so they can
    /// match the absolute paths the editor reports.
    pub fn absolute_roots(&self) -> std::io::Result<Vec<PathBuf>> {
        let cwd = std::env::current_dir()?;
        Ok(self.roots().iter().map(|root| cwd.join(root)).collect())
    }

    pub fn reveal_delay_ms(&self) -> u64 {
        self.sync.reveal_delay_ms.unwrap_or(DEFAULT_REVEAL_DELAY_MS)
    }

    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(true)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.watcher.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
