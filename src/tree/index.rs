use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::node::{NodeId, NodeKind, TreeNode};

/// Flat lookup from node identity to its position in the forest.
///
/// A location is the list of child indices leading from the forest level
/// down to the node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndex {
    locations: HashMap<NodeId, Vec<usize>>,
}

impl NodeIndex {
    /// Index every node reachable from `roots`.
    pub fn build(roots: &[TreeNode]) -> Self {
        let mut index = Self::default();
        let mut trail = Vec::new();
        index.record(roots, &mut trail);
        index
    }

    fn record(&mut self, nodes: &[TreeNode], trail: &mut Vec<usize>) {
        for (i, node) in nodes.iter().enumerate() {
            trail.push(i);
            self.locations.insert(node.id.clone(), trail.clone());
            self.record(&node.children, trail);
            trail.pop();
        }
    }

    pub fn location(&self, id: &NodeId) -> Option<&[usize]> {
        self.locations.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.locations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// The result of one build: top-level nodes plus their index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<TreeNode>,
    index: NodeIndex,
}

impl Forest {
    /// Wrap already-sorted top-level nodes and index them.
    pub fn new(roots: Vec<TreeNode>) -> Self {
        let index = NodeIndex::build(&roots);
        Self { roots, index }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Exact identity lookup.
    pub fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        let location = self.index.location(id)?;
        let (first, rest) = location.split_first()?;
        let mut node = self.roots.get(*first)?;
        for i in rest {
            node = node.children.get(*i)?;
        }
        Some(node)
    }

    /// Lookup when the kind is unknown; files are tried before folders.
    pub fn find_path(&self, path: &Path) -> Option<&TreeNode> {
        self.find(&NodeId::file(path))
            .or_else(|| self.find(&NodeId::folder(path)))
    }

    /// Folder whose path equals `node`'s directory, `None` at forest level.
    pub fn parent_of(&self, node: &TreeNode) -> Option<&TreeNode> {
        let parent = node.id.parent_path()?;
        self.find(&NodeId::folder(parent))
    }

    pub fn children_of(&self, id: &NodeId) -> &[TreeNode] {
        self.find(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Every file at or below `id`, in tree order.
    pub fn files_under(&self, id: &NodeId) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Some(node) = self.find(id) {
            collect_files(node, &mut files);
        }
        files
    }

    /// Every file in the forest, in tree order.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for node in &self.roots {
            collect_files(node, &mut files);
        }
        files
    }
}

fn collect_files(node: &TreeNode, out: &mut Vec<PathBuf>) {
    match node.kind() {
        NodeKind::File => out.push(node.id.path.clone()),
        NodeKind::Folder => {
            for child in &node.children {
                collect_files(child, out);
            }
        }
    }
}
