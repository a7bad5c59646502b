use std::path::PathBuf;

/// Whether pasted items are copied or moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
}

/// Paths marked by cut or copy, waiting for a paste.
#[derive(Debug, Clone, Default)]
pub struct ClipboardState {
    paths: Vec<PathBuf>,
    operation: Option<ClipboardOp>,
}

impl ClipboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents.
    pub fn set(&mut self, paths: Vec<PathBuf>, op: ClipboardOp) {
        self.paths = paths;
        self.operation = Some(op);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.operation = None;
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn operation(&self) -> Option<ClipboardOp> {
        self.operation
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Contents for a paste. A cut is consumed; a copy stays for repeated pastes.
    pub fn take_for_paste(&mut self) -> Option<(Vec<PathBuf>, ClipboardOp)> {
        let op = self.operation?;
        if self.paths.is_empty() {
            return None;
        }
        match op {
            ClipboardOp::Copy => Some((self.paths.clone(), op)),
            ClipboardOp::Cut => {
                let paths = std::mem::take(&mut self.paths);
                self.operation = None;
                Some((paths, op))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clipboard_is_empty() {
        let cb = ClipboardState::new();
        assert!(cb.is_empty());
        assert_eq!(cb.len(), 0);
        assert_eq!(cb.operation(), None);
    }

    #[test]
    fn test_set_overwrites_previous() {
        let mut cb = ClipboardState::new();
        cb.set(vec![PathBuf::from("/tmp/old.txt")], ClipboardOp::Copy);
        cb.set(vec![PathBuf::from("/tmp/new.txt")], ClipboardOp::Cut);
        assert_eq!(cb.len(), 1);
        assert_eq!(cb.operation(), Some(ClipboardOp::Cut));
        assert_eq!(cb.paths()[0], PathBuf::from("/tmp/new.txt"));
    }

    #[test]
    fn test_copy_survives_paste() {
        let mut cb = ClipboardState::new();
        cb.set(vec![PathBuf::from("/tmp/a.txt")], ClipboardOp::Copy);
        assert!(cb.take_for_paste().is_some());
        assert_eq!(cb.len(), 1);
        assert!(cb.take_for_paste().is_some());
    }

    #[test]
    fn test_cut_is_consumed_by_paste() {
        let mut cb = ClipboardState::new();
        cb.set(vec![PathBuf::from("/tmp/a.txt")], ClipboardOp::Cut);
        let (paths, op) = cb.take_for_paste().unwrap();
        assert_eq!(paths, vec![PathBuf::from("/tmp/a.txt")]);
        assert_eq!(op, ClipboardOp::Cut);
        assert!(cb.is_empty());
        assert!(cb.take_for_paste().is_none());
    }

    #[test]
    fn test_clear_resets_clipboard() {
        let mut cb = ClipboardState::new();
        cb.set(vec![PathBuf::from("/tmp/a.txt")], ClipboardOp::Copy);
        cb.clear();
        assert!(cb.is_empty());
        assert_eq!(cb.operation(), None);
        assert!(cb.take_for_paste().is_none());
    }
}
