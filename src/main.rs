use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tabtree::config::{AppConfig, SyncConfig, WatcherConfig, WorkspaceConfig};
use tabtree::error::{self, AppError};
use tabtree::event::{Event, EventHandler};
use tabtree::fs::watcher::SessionWatcher;
use tabtree::host::{HostEvent, OpenTab, WorkspaceSnapshot};
use tabtree::sync::SyncController;
use tabtree::view::TextView;
use tabtree::{logging, session};

/// How often the watch loop checks for due reveals.
const TICK_MS: u64 = 25;

/// Show open editor tabs as a folder tree.
#[derive(Parser, Debug)]
#[command(name = "tabtree", version, about)]
struct Cli {
    /// Config file to load on top of the discovered ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Workspace root (repeatable)
    #[arg(long = "root", global = true)]
    roots: Vec<PathBuf>,

    /// Delay before revealing the active file, in milliseconds
    #[arg(long, global = true)]
    reveal_delay_ms: Option<u64>,

    /// Disable the session file watcher
    #[arg(long, global = true)]
    no_watcher: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Print the tree for a list of open files
    Show {
        /// Open files, in tab order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Active file to reveal (defaults to the last one)
        #[arg(long)]
        active: Option<PathBuf>,
    },
    /// Follow a JSON session file and redraw on every change
    Watch {
        /// Session file written by the editor
        session: PathBuf,
    },
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        let roots = (!self.roots.is_empty()).then(|| {
            self.roots
                .iter()
                .map(|r| r.display().to_string())
                .collect()
        });
        AppConfig {
            workspace: WorkspaceConfig { roots },
            sync: SyncConfig {
                reveal_delay_ms: self.reveal_delay_ms,
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                debounce_ms: None,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref());
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    match &cli.command {
        CliCommand::Show { files, active } => show(&config, files, active.as_deref()),
        CliCommand::Watch { session } => watch(&config, session).await,
    }
}

fn absolute(path: &Path) -> error::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn show(config: &AppConfig, files: &[PathBuf], active: Option<&Path>) -> error::Result<()> {
    let mut roots = config.absolute_roots()?;
    if roots.is_empty() {
        roots.push(std::env::current_dir()?);
    }

    let mut snapshot = WorkspaceSnapshot::new(roots);
    for file in files {
        snapshot.tabs.push(OpenTab::new(absolute(file)?));
    }
    snapshot.active = match active {
        Some(path) => Some(absolute(path)?),
        None => snapshot.tabs.last().map(|t| t.path.clone()),
    };

    let delay = Duration::from_millis(config.reveal_delay_ms());
    let mut sync = SyncController::new(snapshot, TextView::new(io::stdout()), delay);
    let now = Instant::now();
    sync.on_host_event(HostEvent::ViewVisibilityChanged(true), now);
    sync.poll(now + delay);
    Ok(())
}

async fn watch(config: &AppConfig, session_path: &Path) -> error::Result<()> {
    let session_path = absolute(session_path)?;
    let default_roots = config.absolute_roots()?;
    let snapshot = session::load(&session_path, &default_roots)?;
    info!(session = %session_path.display(), tabs = snapshot.tabs.len(), "watching session");

    let delay = Duration::from_millis(config.reveal_delay_ms());
    let mut sync = SyncController::new(snapshot, TextView::new(io::stdout()), delay);
    let mut events = EventHandler::new(Duration::from_millis(TICK_MS));

    let _watcher = if config.watcher_enabled() {
        match SessionWatcher::new(
            &session_path,
            Duration::from_millis(config.debounce_ms()),
            events.sender(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(error = %e, "session watcher unavailable");
                None
            }
        }
    } else {
        None
    };

    sync.on_host_event(HostEvent::ViewVisibilityChanged(true), Instant::now());

    loop {
        match events.next().await {
            Ok(Event::Tick) => {
                sync.poll(Instant::now());
            }
            Ok(Event::SessionChanged) => match session::load(&session_path, &default_roots) {
                Ok(next) => {
                    let changes = session::changes(sync.workspace(), &next);
                    *sync.workspace_mut() = next;
                    let now = Instant::now();
                    for change in changes {
                        sync.on_host_event(change, now);
                    }
                }
                Err(e) => warn!(error = %e, "session reload failed, keeping last tree"),
            },
            Ok(Event::Quit) | Err(AppError::ChannelClosed) => break,
            Err(e) => return Err(e),
        }
    }

    info!("stopped watching");
    Ok(())
}
