use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, trace};

use super::classify::PathClassifier;
use super::index::Forest;
use super::node::{sort_recursive, NodeFlags, NodeId, TreeNode};
use crate::host::OpenTab;

/// Build the open-tabs forest.
///
/// Tabs outside every root are dropped. The same file open in several tabs
/// yields a single node. Output does not depend on the order of `tabs`.
pub fn build(tabs: &[OpenTab], classifier: &PathClassifier) -> Forest {
    let files = merge_tabs(tabs);

    // Children per parent folder; `None` is the forest level.
    let mut children: HashMap<Option<PathBuf>, Vec<NodeId>> = HashMap::new();
    // Folders already created this build.
    let mut folders: HashSet<PathBuf> = HashSet::new();
    let mut dropped = 0usize;

    for path in files.keys() {
        let Some(class) = classifier.classify(path) else {
            trace!(path = %path.display(), "outside workspace roots");
            dropped += 1;
            continue;
        };

        let mut parent: Option<PathBuf> = None;
        for dir in class.ancestors {
            if folders.insert(dir.clone()) {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(NodeId::folder(dir.clone()));
            }
            parent = Some(dir);
        }
        children
            .entry(parent)
            .or_default()
            .push(NodeId::file(path.clone()));
    }

    let mut roots = assemble(None, &mut children, &files);
    sort_recursive(&mut roots);
    let forest = Forest::new(roots);
    debug!(
        tabs = tabs.len(),
        nodes = forest.len(),
        dropped,
        "built open-tabs forest"
    );
    forest
}

/// Collapse tabs by path, merging their flags.
fn merge_tabs(tabs: &[OpenTab]) -> BTreeMap<PathBuf, NodeFlags> {
    let mut files: BTreeMap<PathBuf, NodeFlags> = BTreeMap::new();
    for tab in tabs {
        match files.get_mut(&tab.path) {
            Some(flags) => {
                flags.preview &= tab.preview;
                flags.dirty |= tab.dirty;
                flags.group = match (flags.group, tab.group) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
            None => {
                files.insert(
                    tab.path.clone(),
                    NodeFlags {
                        preview: tab.preview,
                        dirty: tab.dirty,
                        group: tab.group,
                    },
                );
            }
        }
    }
    files
}

/// Turn the parent -> children table into owned nodes, starting at `parent`.
fn assemble(
    parent: Option<PathBuf>,
    children: &mut HashMap<Option<PathBuf>, Vec<NodeId>>,
    files: &BTreeMap<PathBuf, NodeFlags>,
) -> Vec<TreeNode> {
    let Some(ids) = children.remove(&parent) else {
        return Vec::new();
    };
    ids.into_iter()
        .map(|id| {
            let flags = if id.is_folder() {
                NodeFlags::default()
            } else {
                files.get(&id.path).cloned().unwrap_or_default()
            };
            let sub = if id.is_folder() {
                assemble(Some(id.path.clone()), children, files)
            } else {
                Vec::new()
            };
            let mut node = TreeNode::new(id, flags);
            node.children = sub;
            node
        })
        .collect()
}
