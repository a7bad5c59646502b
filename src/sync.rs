//! Keeps the open-tabs forest in step with host notifications.
//!
//! Every change notification drops the cached forest. While the view is
//! visible a rebuild runs immediately and a reveal of the active file is
//! scheduled a short delay later; a newer request always replaces the
//! pending reveal. While hidden nothing is built.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::host::{HostEvent, RevealOptions, TreeView, Workspace};
use crate::tree::{self, Forest, NodeId, PathClassifier, TreeNode};

/// Default delay between a rebuild and the reveal of the active file.
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 100;

/// A reveal waiting for its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReveal {
    pub deadline: Instant,
    /// Active file at the time of the request.
    pub target: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    PendingReveal(PendingReveal),
}

/// What `poll` did with a due reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed(NodeId),
    /// The target was not in the forest when the timer fired.
    Missed(PathBuf),
    /// No editor was active.
    NoTarget,
}

/// Owns the workspace, the view and the cached forest.
pub struct SyncController<W: Workspace, V: TreeView> {
    workspace: W,
    view: V,
    state: SyncState,
    visible: bool,
    /// `None` while invalid.
    cache: Option<Forest>,
    reveal_delay: Duration,
    builds: u64,
}

impl<W: Workspace, V: TreeView> SyncController<W, V> {
    /// Create a controller for a view that starts hidden.
    pub fn new(workspace: W, view: V, reveal_delay: Duration) -> Self {
        Self {
            workspace,
            view,
            state: SyncState::Idle,
            visible: false,
            cache: None,
            reveal_delay,
            builds: 0,
        }
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// Mutable access for the embedding layer. Follow changes with an event.
    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_valid(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of forest builds so far.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    pub fn classifier(&self) -> PathClassifier {
        PathClassifier::new(self.workspace.roots())
    }

    /// Deadline of the pending reveal, for scheduling the next wakeup.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            SyncState::PendingReveal(p) => Some(p.deadline),
            SyncState::Idle => None,
        }
    }

    /// Single entry point for host notifications.
    pub fn on_host_event(&mut self, event: HostEvent, now: Instant) {
        trace!(?event, "host event");
        match event {
            HostEvent::ViewVisibilityChanged(true) => {
                self.visible = true;
                self.request_sync(now);
            }
            HostEvent::ViewVisibilityChanged(false) => {
                self.visible = false;
                self.cancel_reveal();
            }
            // only regaining focus can mean the tabs changed elsewhere
            HostEvent::WindowFocusChanged(false) => {}
            _ => {
                self.invalidate();
                self.request_sync(now);
            }
        }
    }

    /// Drop the cached forest; the next access rebuilds it.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Rebuild now and schedule a reveal of the active file.
    ///
    /// Does nothing while the view is hidden.
    pub fn request_sync(&mut self, now: Instant) {
        if !self.visible {
            trace!("view hidden, sync skipped");
            return;
        }
        self.cancel_reveal();

        let forest = self.cache.insert(build_forest(&self.workspace));
        self.builds += 1;
        self.view.tree_changed(forest);

        self.state = SyncState::PendingReveal(PendingReveal {
            deadline: now + self.reveal_delay,
            target: self.workspace.active_file(),
        });
    }

    pub fn cancel_reveal(&mut self) {
        self.state = SyncState::Idle;
    }

    /// Fire the pending reveal if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<RevealOutcome> {
        let due = matches!(&self.state, SyncState::PendingReveal(p) if p.deadline <= now);
        if !due {
            return None;
        }
        let SyncState::PendingReveal(pending) = std::mem::replace(&mut self.state, SyncState::Idle)
        else {
            return None;
        };

        let Some(target) = pending.target else {
            return Some(RevealOutcome::NoTarget);
        };
        self.ensure_built();
        let forest = self.cache.as_ref()?;
        match forest.find(&NodeId::file(target.as_path())) {
            Some(node) => {
                self.view.reveal(node, RevealOptions::default());
                Some(RevealOutcome::Revealed(node.id.clone()))
            }
            None => {
                debug!(path = %target.display(), "reveal target not in tree");
                Some(RevealOutcome::Missed(target))
            }
        }
    }

    fn ensure_built(&mut self) {
        if self.cache.is_none() {
            self.cache = Some(build_forest(&self.workspace));
            self.builds += 1;
        }
    }

    /// Current forest, built lazily when invalid.
    pub fn forest(&mut self) -> &Forest {
        self.ensure_built();
        self.cache.get_or_insert_with(Forest::default)
    }

    /// Top-level nodes.
    pub fn roots(&mut self) -> &[TreeNode] {
        self.forest().roots()
    }

    pub fn children(&mut self, id: &NodeId) -> &[TreeNode] {
        self.forest().children_of(id)
    }

    pub fn parent(&mut self, id: &NodeId) -> Option<&TreeNode> {
        let forest = self.forest();
        let node = forest.find(id)?;
        forest.parent_of(node)
    }
}

fn build_forest<W: Workspace>(workspace: &W) -> Forest {
    let classifier = PathClassifier::new(workspace.roots());
    tree::build(&workspace.open_tabs(), &classifier)
}
