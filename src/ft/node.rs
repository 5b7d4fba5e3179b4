//! Directory and file nodes, stored in an arena and addressed by generational handles.
//!
//! ### Invariants
//!
//! 1. A child's path is exactly one segment deeper than its parent's, and the parent's path
//!    is a prefix of it.
//! 2. A node's parent, if any, is a directory.
//! 3. A directory's children are unique and sorted ascending by path, so lookups are a
//!    binary search and insertions never re-sort.
//! 4. A file never owns children and a directory never owns contents (enforced by
//!    [`NodeKind`]).

use std::cmp::Ordering;
use std::collections::TryReserveError;
use std::fmt;

use crate::core::{FtError, FtPath, Result, TreeConfig};
use crate::ft::EntryType;

/// Handle to a node inside [`Nodes`].
///
/// Handles are generational: once a node is freed, its handle never resolves again, even
/// after the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory { children: Vec<NodeId> },
    File { contents: Option<Vec<u8>> },
}

impl NodeKind {
    pub fn directory() -> Self {
        NodeKind::Directory {
            children: Vec::new(),
        }
    }

    pub fn file(contents: Option<Vec<u8>>) -> Self {
        NodeKind::File { contents }
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            NodeKind::Directory { .. } => EntryType::Directory,
            NodeKind::File { .. } => EntryType::File,
        }
    }
}

/// One directory or file of the tree.
#[derive(Debug)]
pub struct Node {
    path: FtPath,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn path(&self) -> &FtPath {
        &self.path
    }

    /// Owning directory; `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn entry_type(&self) -> EntryType {
        self.kind.entry_type()
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type() == EntryType::File
    }

    /// Sorted children; always empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    /// File contents. `None` for directories and for files stored without contents.
    pub fn contents(&self) -> Option<&[u8]> {
        match &self.kind {
            NodeKind::File { contents } => contents.as_deref(),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn contents_len(&self) -> usize {
        self.contents().map_or(0, <[u8]>::len)
    }

    pub fn compare(&self, other: &Node) -> Ordering {
        self.path.cmp(&other.path)
    }

    pub fn compare_str(&self, path: &str) -> Ordering {
        self.path.compare_str(path)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    node: Option<Node>,
}

/// Arena owning every node of a tree.
///
/// Parent links are plain handles, so they never keep a parent alive; each directory owns
/// its subtree through its child handles.
#[derive(Debug)]
pub struct Nodes {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    live: usize,
    limit: Option<usize>,
    children_capacity: usize,
}

impl Nodes {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            live: 0,
            limit: config.node_limit,
            children_capacity: config.children_capacity,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Number of children; 0 for files and stale handles.
    pub fn num_children(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |node| node.children().len())
    }

    /// Child of `parent` at position `index` in sorted order.
    pub fn child(&self, parent: NodeId, index: usize) -> Result<NodeId> {
        let node = self
            .get(parent)
            .ok_or_else(|| FtError::NoSuchPath("stale node handle".to_string()))?;
        node.children().get(index).copied().ok_or_else(|| {
            FtError::NoSuchPath(format!("{} has no child at index {index}", node.path))
        })
    }

    /// Binary-searches the children of `parent` for `path`.
    ///
    /// Follows the `slice::binary_search` convention: `Ok(index)` if found, otherwise
    /// `Err(index)` where a child with that path would be inserted. Files and stale handles
    /// report `Err(0)`.
    pub fn has_child(&self, parent: NodeId, path: &str) -> std::result::Result<usize, usize> {
        let Some(node) = self.get(parent) else {
            return Err(0);
        };
        node.children().binary_search_by(|&child| {
            let child = self.get(child);
            debug_assert!(child.is_some(), "{node} links a stale child");
            child.map_or(Ordering::Less, |child| child.compare_str(path))
        })
    }

    /// Creates a node at `path` and links it into `parent` at its sorted position.
    ///
    /// Every check and every reservation happens before the node is linked, so on error
    /// nothing has changed.
    pub(crate) fn insert(
        &mut self,
        path: FtPath,
        parent: Option<NodeId>,
        mut kind: NodeKind,
    ) -> Result<NodeId> {
        let link = match parent {
            None => {
                if path.depth() != 1 {
                    return Err(FtError::NoSuchPath(format!(
                        "{path} is too deep to be a root"
                    )));
                }
                None
            }
            Some(parent_id) => {
                let parent_node = self
                    .get(parent_id)
                    .ok_or_else(|| FtError::NoSuchPath(format!("parent of {path} is gone")))?;
                let parent_depth = parent_node.path.depth();
                if !parent_node.is_dir()
                    || path.shared_prefix_depth(&parent_node.path) < parent_depth
                {
                    return Err(FtError::ConflictingPath(format!(
                        "{} cannot hold {path}",
                        parent_node.path
                    )));
                }
                if path.depth() != parent_depth + 1 {
                    return Err(FtError::NoSuchPath(format!(
                        "{path} is not a direct child of {}",
                        parent_node.path
                    )));
                }
                match self.has_child(parent_id, path.pathname()) {
                    Ok(_) => return Err(FtError::AlreadyInTree(path.to_string())),
                    Err(index) => Some((parent_id, index)),
                }
            }
        };

        if let Some(limit) = self.limit {
            if self.live >= limit {
                return Err(FtError::Memory(format!(
                    "node limit of {limit} reached while creating {path}"
                )));
            }
        }
        if self.vacant.is_empty() {
            self.slots.try_reserve(1).map_err(out_of_memory)?;
        }
        if let NodeKind::Directory { children } = &mut kind {
            children
                .try_reserve(self.children_capacity)
                .map_err(out_of_memory)?;
        }
        if let Some((parent_id, _)) = link {
            if let Some(children) = self.children_mut(parent_id) {
                children.try_reserve(1).map_err(out_of_memory)?;
            }
        }

        let node = Node { path, parent, kind };
        let id = match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.live += 1;

        if let Some((parent_id, index)) = link {
            if let Some(children) = self.children_mut(parent_id) {
                children.insert(index, id);
            }
        }
        Ok(id)
    }

    /// Destroys the subtree rooted at `id` and detaches it from its parent.
    /// Returns the number of nodes destroyed (0 for a stale handle).
    pub(crate) fn free(&mut self, id: NodeId) -> usize {
        let Some(node) = self.get(id) else {
            return 0;
        };
        let detach = node.parent.and_then(|parent| {
            self.has_child(parent, node.path.pathname())
                .ok()
                .map(|index| (parent, index))
        });
        if let Some((parent, index)) = detach {
            if let Some(children) = self.children_mut(parent) {
                children.remove(index);
            }
        }

        let mut freed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.release(next) {
                freed += 1;
                if let NodeKind::Directory { children } = node.kind {
                    pending.extend(children);
                }
            }
        }
        freed
    }

    /// Swaps the contents of a file, handing the previous buffer back to the caller.
    pub(crate) fn set_contents(
        &mut self,
        id: NodeId,
        contents: Option<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| FtError::NoSuchPath("stale node handle".to_string()))?;
        match &mut node.kind {
            NodeKind::File { contents: current } => Ok(std::mem::replace(current, contents)),
            NodeKind::Directory { .. } => Err(FtError::NotAFile(node.path.to_string())),
        }
    }

    fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation += 1;
        self.vacant.push(id.index);
        self.live -= 1;
        Some(node)
    }
}

fn out_of_memory(err: TryReserveError) -> FtError {
    FtError::Memory(err.to_string())
}
