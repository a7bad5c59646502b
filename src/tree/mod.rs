//! Open-tabs forest: path classification, building, and the node index.

pub mod builder;
pub mod classify;
pub mod index;
pub mod node;

pub use builder::build;
pub use classify::{Classification, PathClassifier};
pub use index::{Forest, NodeIndex};
pub use node::{NodeFlags, NodeId, NodeKind, TreeNode};
