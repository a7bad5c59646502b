//! Adapter from model nodes to what a renderer shows.

use std::io::Write;

use tracing::warn;

use crate::host::{RevealOptions, TreeView};
use crate::tree::{Forest, NodeKind, PathClassifier, TreeNode};

/// Whether a row can be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapsible {
    None,
    Expanded,
}

/// Render-ready description of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewItem {
    pub label: String,
    /// Secondary text: markers for preview and unsaved tabs.
    pub description: Option<String>,
    /// Full path, or root-relative when a classifier is given.
    pub tooltip: String,
    pub collapsible: Collapsible,
    /// Key for context-menu rules.
    pub context_value: &'static str,
}

impl ViewItem {
    pub fn from_node(node: &TreeNode, classifier: Option<&PathClassifier>) -> Self {
        let mut markers = Vec::new();
        if node.flags.preview {
            markers.push("preview");
        }
        if node.flags.dirty {
            markers.push("unsaved");
        }
        let tooltip = classifier
            .and_then(|c| c.relative_path(node.path()))
            .unwrap_or(node.path())
            .display()
            .to_string();

        let (collapsible, context_value) = match node.kind() {
            NodeKind::Folder => (Collapsible::Expanded, "folder"),
            NodeKind::File => (Collapsible::None, "file"),
        };

        Self {
            label: node.name.clone(),
            description: (!markers.is_empty()).then(|| markers.join(", ")),
            tooltip,
            collapsible,
            context_value,
        }
    }
}

/// Render the forest as an indented text tree with box-drawing guides.
pub fn render_forest(forest: &Forest) -> Vec<String> {
    let mut lines = Vec::new();
    let mut guides = Vec::new();
    render_level(forest.roots(), &mut guides, &mut lines);
    lines
}

fn render_level(nodes: &[TreeNode], guides: &mut Vec<bool>, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let mut prefix = String::new();
        for ancestor_is_last in guides.iter() {
            prefix.push_str(if *ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if is_last { "└──" } else { "├──" });

        let item = ViewItem::from_node(node, None);
        let indicator = match item.collapsible {
            Collapsible::Expanded => "[D] ",
            Collapsible::None => "[F] ",
        };
        let line = match &item.description {
            Some(desc) => format!("{} {}{} ({})", prefix, indicator, item.label, desc),
            None => format!("{} {}{}", prefix, indicator, item.label),
        };
        lines.push(line);

        guides.push(is_last);
        render_level(&node.children, guides, lines);
        guides.pop();
    }
}

/// `TreeView` that prints to a writer, used by the binary.
pub struct TextView<O: Write> {
    out: O,
}

impl<O: Write> TextView<O> {
    pub fn new(out: O) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> O {
        self.out
    }
}

impl<O: Write> TreeView for TextView<O> {
    fn tree_changed(&mut self, forest: &Forest) {
        let mut text = String::new();
        if forest.is_empty() {
            text.push_str("(no open files in workspace)\n");
        }
        for line in render_forest(forest) {
            text.push_str(&line);
            text.push('\n');
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            warn!(error = %e, "failed to write tree");
        }
    }

    fn reveal(&mut self, node: &TreeNode, _options: RevealOptions) {
        if let Err(e) = writeln!(self.out, "→ {}", node.path().display()) {
            warn!(error = %e, "failed to write reveal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::OpenTab;
    use crate::tree::{build, NodeFlags, NodeId};
    use std::path::PathBuf;

    fn sample_forest() -> Forest {
        let tabs = vec![
            OpenTab::new("/ws/src/main.rs"),
            OpenTab::new("/ws/src/tree/mod.rs").preview(true),
            OpenTab::new("/ws/README.md"),
        ];
        build(&tabs, &PathClassifier::new(vec![PathBuf::from("/ws")]))
    }

    #[test]
    fn test_render_draws_guides() {
        let lines = render_forest(&sample_forest());
        assert_eq!(
            lines,
            vec![
                "├── [D] src",
                "│  ├── [D] tree",
                "│  │  └── [F] mod.rs (preview)",
                "│  └── [F] main.rs",
                "└── [F] README.md",
            ]
        );
    }

    #[test]
    fn test_view_item_for_folder() {
        let node = TreeNode::new(NodeId::folder("/ws/src"), NodeFlags::default());
        let item = ViewItem::from_node(&node, None);
        assert_eq!(item.label, "src");
        assert_eq!(item.collapsible, Collapsible::Expanded);
        assert_eq!(item.context_value, "folder");
        assert_eq!(item.description, None);
        assert_eq!(item.tooltip, "/ws/src");
    }

    #[test]
    fn test_view_item_markers_and_relative_tooltip() {
        let node = TreeNode::new(
            NodeId::file("/ws/src/lib.rs"),
            NodeFlags {
                preview: true,
                dirty: true,
                group: None,
            },
        );
        let classifier = PathClassifier::new(vec![PathBuf::from("/ws")]);
        let item = ViewItem::from_node(&node, Some(&classifier));
        assert_eq!(item.description.as_deref(), Some("preview, unsaved"));
        assert_eq!(item.tooltip, "src/lib.rs");
        assert_eq!(item.context_value, "file");
    }

    #[test]
    fn test_text_view_prints_tree_and_reveal() {
        let forest = sample_forest();
        let mut view = TextView::new(Vec::new());
        view.tree_changed(&forest);
        let node = forest.find(&NodeId::file("/ws/README.md")).unwrap();
        view.reveal(node, RevealOptions::default());
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.contains("└── [F] README.md\n"));
        assert!(out.ends_with("→ /ws/README.md\n"));
    }

    #[test]
    fn test_text_view_empty_forest() {
        let mut view = TextView::new(Vec::new());
        view.tree_changed(&Forest::default());
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "(no open files in workspace)\n");
    }
}
