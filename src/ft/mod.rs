mod checker;
mod entry;
mod file_tree;
mod node;

pub use entry::{EntryType, Stat};
pub use file_tree::{FileTree, Walk};
pub use node::{Node, NodeId, NodeKind, Nodes};
