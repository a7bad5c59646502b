use std::path::{Path, PathBuf};

/// Result of classifying a path against the workspace roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    /// The root that contains the path.
    pub root: &'a Path,
    /// Directories strictly below `root` down to the path's parent, root first.
    pub ancestors: Vec<PathBuf>,
}

/// Decides which open files belong to a workspace root.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    roots: Vec<PathBuf>,
}

impl PathClassifier {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Find the first root (in declaration order) containing `path`.
    ///
    /// Containment is per path component, and a root never contains itself.
    pub fn root_of(&self, path: &Path) -> Option<&Path> {
        self.roots
            .iter()
            .map(PathBuf::as_path)
            .find(|root| path != *root && path.starts_with(root))
    }

    /// Classify `path`, returning its root and ancestor chain.
    pub fn classify(&self, path: &Path) -> Option<Classification<'_>> {
        let root = self.root_of(path)?;
        Some(Classification {
            root,
            ancestors: ancestor_chain(path, root),
        })
    }

    /// Path of `path` relative to its root.
    pub fn relative_path<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        let root = self.root_of(path)?;
        path.strip_prefix(root).ok()
    }
}

/// Walk up from `path`'s parent until `root`, returning the directories root-first.
fn ancestor_chain(path: &Path, root: &Path) -> Vec<PathBuf> {
    let mut chain = Vec::new();
    let mut current = path;
    while let Some(parent) = current.parent() {
        // filesystem root: parent of x is x
        if parent == current || parent == root {
            break;
        }
        chain.push(parent.to_path_buf());
        current = parent;
    }
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(roots: &[&str]) -> PathClassifier {
        PathClassifier::new(roots.iter().map(PathBuf::from).collect())
    }

    #[test]
    fn test_nested_file_yields_ancestors_root_first() {
        let c = classifier(&["/root"]);
        let result = c.classify(Path::new("/root/a/b/c.txt")).unwrap();
        assert_eq!(result.root, Path::new("/root"));
        assert_eq!(
            result.ancestors,
            vec![PathBuf::from("/root/a"), PathBuf::from("/root/a/b")]
        );
    }

    #[test]
    fn test_direct_child_has_empty_chain() {
        let c = classifier(&["/root"]);
        let result = c.classify(Path::new("/root/top.txt")).unwrap();
        assert!(result.ancestors.is_empty());
    }

    #[test]
    fn test_path_outside_roots_is_not_applicable() {
        let c = classifier(&["/root"]);
        assert!(c.classify(Path::new("/other/x.txt")).is_none());
    }

    #[test]
    fn test_sibling_with_name_prefix_is_not_contained() {
        let c = classifier(&["/root"]);
        assert!(c.classify(Path::new("/rootx/a.txt")).is_none());
    }

    #[test]
    fn test_root_itself_is_not_applicable() {
        let c = classifier(&["/root"]);
        assert!(c.classify(Path::new("/root")).is_none());
    }

    #[test]
    fn test_first_declared_root_wins() {
        let c = classifier(&["/ws", "/ws/inner"]);
        let result = c.classify(Path::new("/ws/inner/x.rs")).unwrap();
        assert_eq!(result.root, Path::new("/ws"));
        assert_eq!(result.ancestors, vec![PathBuf::from("/ws/inner")]);
    }

    #[test]
    fn test_filesystem_root_terminates_walk() {
        let c = classifier(&["/"]);
        let result = c.classify(Path::new("/etc/hosts")).unwrap();
        assert_eq!(result.ancestors, vec![PathBuf::from("/etc")]);

        let top = c.classify(Path::new("/file")).unwrap();
        assert!(top.ancestors.is_empty());
    }

    #[test]
    fn test_no_roots_classifies_nothing() {
        let c = PathClassifier::default();
        assert!(c.classify(Path::new("/root/a.txt")).is_none());
    }

    #[test]
    fn test_relative_path_strips_root() {
        let c = classifier(&["/ws"]);
        assert_eq!(
            c.relative_path(Path::new("/ws/src/main.rs")),
            Some(Path::new("src/main.rs"))
        );
        assert_eq!(c.relative_path(Path::new("/elsewhere/x")), None);
    }
}
