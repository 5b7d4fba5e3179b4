//! An in-memory hierarchical file tree for Rust.
//! Keeps a single-rooted hierarchy of directories and files entirely in memory, addressed by
//! slash-delimited absolute paths. Nothing touches a storage device.
//!
//! ### Overview
//!
//! `ft-kit` exposes [`FileTree`], an explicit context object with an `init` / `destroy`
//! lifecycle, on top of an arena of [`Node`]s addressed by generational [`NodeId`] handles.
//!
//! **Key ideas**:
//! - **Implicit parents**: inserting `/a/b/c` creates `/a` and `/a/b` as directories when missing.
//! - **Atomicity**: a failed insert frees whatever it created, so the tree is never left half-built.
//! - **Ordering**: siblings are kept sorted by path; lookups are binary searches.
//! - **Typed errors**: every failure is one [`FtError`] kind; existence probes return `bool` / `Option`.
//! - **Determinism**: [`FileTree::render`] dumps the tree in a stable pre-order.
//!
//! ### Example
//!
//! ```
//! use ft_kit::{FileTree, Stat};
//!
//! let mut tree = FileTree::new();
//! tree.init().unwrap();
//!
//! tree.insert_file("/home/user/notes.txt", Some(b"hello".to_vec())).unwrap();
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.stat("/home/user/notes.txt").unwrap(), Stat::File { size: 5 });
//!
//! tree.remove_directory("/home/user").unwrap();
//! assert_eq!(tree.render().unwrap(), "/home\n");
//! ```

mod core;
mod ft;

pub use crate::core::{FtError, FtPath, Result, TreeConfig};
pub use crate::ft::{EntryType, FileTree, Node, NodeId, NodeKind, Nodes, Stat, Walk};
