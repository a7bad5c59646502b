use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Kind of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Folder,
    File,
}

/// Identity of a node: its absolute path plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub path: PathBuf,
    pub kind: NodeKind,
}

impl NodeId {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Directory this node lives in, `None` at a filesystem root.
    pub fn parent_path(&self) -> Option<&Path> {
        self.path.parent().filter(|p| *p != self.path.as_path())
    }
}

/// Per-build markers taken from the host tab state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Every tab showing this file is a preview tab.
    pub preview: bool,
    /// Some tab showing this file has unsaved changes.
    pub dirty: bool,
    /// Lowest tab group showing this file.
    pub group: Option<usize>,
}

/// A file or synthesized folder in the open-tabs forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub children: Vec<TreeNode>,
    pub flags: NodeFlags,
}

impl TreeNode {
    pub fn new(id: NodeId, flags: NodeFlags) -> Self {
        let name = display_name(&id.path);
        Self {
            id,
            name,
            children: Vec::new(),
            flags,
        }
    }

    pub fn path(&self) -> &Path {
        &self.id.path
    }

    pub fn kind(&self) -> NodeKind {
        self.id.kind
    }

    pub fn is_folder(&self) -> bool {
        self.id.is_folder()
    }
}

/// Last path segment, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Sibling order: folders first, then by full path ignoring case.
pub fn sibling_order(a: &NodeId, b: &NodeId) -> Ordering {
    a.kind.cmp(&b.kind).then_with(|| {
        let left = a.path.to_string_lossy().to_lowercase();
        let right = b.path.to_string_lossy().to_lowercase();
        left.cmp(&right).then_with(|| a.path.cmp(&b.path))
    })
}

/// Recursively sort every sibling list below (and including) `nodes`.
pub fn sort_recursive(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| sibling_order(&a.id, &b.id));
    for node in nodes.iter_mut() {
        sort_recursive(&mut node.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_sort_before_files_then_by_path() {
        let mut nodes = vec![
            TreeNode::new(NodeId::file("/r/b.txt"), NodeFlags::default()),
            TreeNode::new(NodeId::folder("/r/A"), NodeFlags::default()),
            TreeNode::new(NodeId::file("/r/a.txt"), NodeFlags::default()),
        ];
        sort_recursive(&mut nodes);
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_case_differences_break_ties_deterministically() {
        let a = NodeId::file("/r/Readme.md");
        let b = NodeId::file("/r/readme.md");
        assert_eq!(sibling_order(&a, &b), Ordering::Less);
        assert_eq!(sibling_order(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_display_name_is_last_segment() {
        assert_eq!(display_name(Path::new("/r/src/lib.rs")), "lib.rs");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn test_parent_path_stops_at_filesystem_root() {
        assert_eq!(NodeId::folder("/").parent_path(), None);
        assert_eq!(
            NodeId::file("/r/x.txt").parent_path(),
            Some(Path::new("/r"))
        );
    }
}
