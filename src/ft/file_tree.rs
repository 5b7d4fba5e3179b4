//! This module provides the file tree: a single-rooted, in-memory hierarchy of directories and
//! files addressed by absolute paths.
//!
//! ### Key Features:
//! - **Implicit parents**: inserting `/a/b/c` creates every missing directory on the way.
//! - **Atomic inserts**: a failed insert leaves the tree exactly as it was.
//! - **Deterministic dump**: `render()` lists paths pre-order, files before directories at
//!   every level, siblings in path order.

use std::fmt;

use log::{debug, trace, warn};

use crate::core::{FtError, FtPath, Result, TreeConfig};
use crate::ft::{EntryType, NodeId, NodeKind, Nodes, Stat};

/// An in-memory file tree.
///
/// `FileTree` starts out uninitialized. [`init`](FileTree::init) makes it usable and
/// [`destroy`](FileTree::destroy) tears it down again; every other operation requires the
/// initialized state and fails with `FtError::Initialization` otherwise.
///
/// ### Internal state
///
/// * `initialized` — lifecycle flag.
/// * `root` — handle of the root directory, present iff the tree is non-empty.
/// * `count` — number of live nodes, directories and files alike.
/// * `nodes` — arena owning every node; the root owns its subtree through child handles.
///
/// ### Thread Safety
///
/// No internal locking. Wrap it in a `Mutex` or `RwLock` if it must be shared.
///
/// ### Example
///
/// ```
/// use ft_kit::FileTree;
///
/// let mut tree = FileTree::new();
/// tree.init().unwrap();
///
/// tree.insert_directory("/docs/drafts").unwrap();
/// tree.insert_file("/docs/note.txt", Some(b"Hello".to_vec())).unwrap();
///
/// assert!(tree.contains_directory("/docs"));
/// assert_eq!(tree.get_file_contents("/docs/note.txt"), Some(&b"Hello"[..]));
/// assert_eq!(
///     tree.render().unwrap(),
///     "/docs\n/docs/note.txt\n/docs/drafts\n"
/// );
/// ```
#[derive(Debug)]
pub struct FileTree {
    initialized: bool,
    root: Option<NodeId>,
    count: usize,
    nodes: Nodes,
    config: TreeConfig,
}

impl FileTree {
    /// Creates an uninitialized tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            initialized: false,
            root: None,
            count: 0,
            nodes: Nodes::new(&config),
            config,
        }
    }

    /// Moves the tree into the initialized, empty state.
    /// Fails if it is already initialized.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Err(FtError::Initialization);
        }
        self.initialized = true;
        self.root = None;
        self.count = 0;
        debug!("file tree initialized");
        Ok(())
    }

    /// Frees every node and returns the tree to the uninitialized state.
    /// Fails if it is not initialized. Destroying an empty tree is a plain state change.
    pub fn destroy(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        let freed = match self.root.take() {
            Some(root) => self.nodes.free(root),
            None => 0,
        };
        self.count = 0;
        self.initialized = false;
        debug!("file tree destroyed, {freed} node(s) freed");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Read-only access to the nodes, for walking the structure by handle.
    pub fn nodes(&self) -> &Nodes {
        &self.nodes
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Walks from the root toward `path` one level at a time, without creating anything.
    ///
    /// Returns the deepest existing node on the way (the node at `path` itself if present),
    /// or `None` for an empty tree. Fails with `FtError::ConflictingPath` when the root is
    /// not the first segment of `path` and with `FtError::Initialization` before `init`.
    pub fn traverse_toward(&self, path: &FtPath) -> Result<Option<NodeId>> {
        self.ensure_initialized()?;
        let Some(root) = self.root else {
            return Ok(None);
        };
        let root_node = self
            .nodes
            .get(root)
            .ok_or_else(|| FtError::NoSuchPath("root handle is stale".to_string()))?;
        if root_node.path().compare_str(path.prefix(1)?.pathname()).is_ne() {
            return Err(FtError::ConflictingPath(format!(
                "{path} is not under root {}",
                root_node.path()
            )));
        }

        let mut current = root;
        for depth in 2..=path.depth() {
            let prefix = path.prefix(depth)?;
            match self.nodes.has_child(current, prefix.pathname()) {
                Ok(index) => {
                    current = self.nodes.child(current, index)?;
                    trace!("traverse {path}: reached {prefix}");
                }
                Err(_) => break,
            }
        }
        Ok(Some(current))
    }

    /// Looks up the node at exactly `path`.
    ///
    /// Fails with `FtError::NoSuchPath` if only a proper prefix of it exists.
    pub fn find(&self, path: &str) -> Result<NodeId> {
        self.ensure_initialized()?;
        let path = FtPath::new(path)?;
        let found = self
            .traverse_toward(&path)?
            .ok_or_else(|| FtError::NoSuchPath(path.to_string()))?;
        match self.nodes.get(found) {
            Some(node) if node.path() == &path => Ok(found),
            _ => Err(FtError::NoSuchPath(path.to_string())),
        }
    }

    /// Inserts a directory at `path`, creating missing parent directories.
    ///
    /// # Errors
    /// * `BadPath` — `path` is malformed.
    /// * `ConflictingPath` — a root exists and `path` is not under it.
    /// * `NotADirectory` — `path` or one of its prefixes is a file.
    /// * `AlreadyInTree` — `path` exists as a directory.
    /// * `Memory` — a node could not be allocated; nothing is inserted.
    pub fn insert_directory(&mut self, path: &str) -> Result<()> {
        self.insert_path(path, NodeKind::directory())
    }

    /// Inserts a file at `path` holding `contents`, creating missing parent directories.
    ///
    /// The tree takes ownership of `contents`. Fails like
    /// [`insert_directory`](FileTree::insert_directory), and additionally with
    /// `ConflictingPath` for a root-level path, even one that names the existing root: a file
    /// can never be the root.
    pub fn insert_file(&mut self, path: &str, contents: Option<Vec<u8>>) -> Result<()> {
        self.insert_path(path, NodeKind::file(contents))
    }

    pub fn contains_directory(&self, path: &str) -> bool {
        self.find(path)
            .ok()
            .and_then(|id| self.nodes.get(id))
            .is_some_and(|node| node.is_dir())
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.find(path)
            .ok()
            .and_then(|id| self.nodes.get(id))
            .is_some_and(|node| node.is_file())
    }

    /// Removes the directory at `path` together with everything below it.
    pub fn remove_directory(&mut self, path: &str) -> Result<()> {
        let id = self.find(path)?;
        if self.nodes.get(id).is_some_and(|node| node.is_file()) {
            return Err(FtError::NotADirectory(path.to_string()));
        }
        let freed = self.nodes.free(id);
        self.count -= freed;
        if self.root == Some(id) {
            self.root = None;
        }
        debug!("removed directory {path} ({freed} node(s))");
        Ok(())
    }

    pub fn remove_file(&mut self, path: &str) -> Result<()> {
        let id = self.find(path)?;
        if self.nodes.get(id).is_some_and(|node| node.is_dir()) {
            return Err(FtError::NotAFile(path.to_string()));
        }
        self.count -= self.nodes.free(id);
        debug!("removed file {path}");
        Ok(())
    }

    /// Returns the contents of the file at `path`.
    ///
    /// `None` covers every failure as well as a file stored without contents; use
    /// [`stat`](FileTree::stat) to tell them apart.
    pub fn get_file_contents(&self, path: &str) -> Option<&[u8]> {
        let id = self.find(path).ok()?;
        self.nodes.get(id)?.contents()
    }

    /// Replaces the contents of the file at `path`, returning the previous contents.
    ///
    /// `None` covers every failure as well as a file that previously had no contents; see
    /// [`try_replace_file_contents`](FileTree::try_replace_file_contents).
    pub fn replace_file_contents(
        &mut self,
        path: &str,
        contents: Option<Vec<u8>>,
    ) -> Option<Vec<u8>> {
        self.try_replace_file_contents(path, contents).ok().flatten()
    }

    /// Like [`replace_file_contents`](FileTree::replace_file_contents), but reports why the
    /// replacement failed.
    pub fn try_replace_file_contents(
        &mut self,
        path: &str,
        contents: Option<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>> {
        let id = self.find(path)?;
        let old = self.nodes.set_contents(id, contents)?;
        debug!("replaced contents of {path}");
        Ok(old)
    }

    /// Reports whether `path` is a file or a directory and, for files, the content length.
    pub fn stat(&self, path: &str) -> Result<Stat> {
        let id = self.find(path)?;
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| FtError::NoSuchPath(path.to_string()))?;
        if node.is_dir() {
            Ok(Stat::Directory)
        } else {
            Ok(Stat::File {
                size: node.contents_len(),
            })
        }
    }

    /// Iterates over the tree in dump order: each directory, then its files, then its
    /// subdirectories recursively. Empty for an empty or uninitialized tree.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            nodes: &self.nodes,
            pending: self.root.into_iter().collect(),
        }
    }

    /// Dumps the tree as one path per line in [`walk`](FileTree::walk) order.
    /// Returns `None` if the tree is not initialized.
    pub fn render(&self) -> Option<String> {
        if !self.initialized {
            return None;
        }
        Some(self.to_string())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(FtError::Initialization)
        }
    }

    /// Shared body of `insert_directory` and `insert_file`. Missing levels above the target
    /// become directories and the target gets `leaf`. On failure the levels created by this
    /// call are freed and `root` and `count` are untouched.
    fn insert_path(&mut self, raw: &str, leaf: NodeKind) -> Result<()> {
        self.ensure_initialized()?;
        let path = FtPath::new(raw)?;
        let ancestor = self.traverse_toward(&path)?;

        let ancestor_node = match ancestor {
            Some(id) => Some(
                self.nodes
                    .get(id)
                    .ok_or_else(|| FtError::NoSuchPath(path.to_string()))?,
            ),
            None => None,
        };
        match ancestor_node {
            Some(node) if node.is_file() => {
                return Err(FtError::NotADirectory(node.path().to_string()));
            }
            None if self.root.is_some() => {
                return Err(FtError::ConflictingPath(path.to_string()));
            }
            _ => {}
        }
        if leaf.entry_type() == EntryType::File && path.depth() == 1 {
            return Err(FtError::ConflictingPath(format!(
                "{path} would make a file the root"
            )));
        }
        let start = match ancestor_node {
            Some(node) if node.path() == &path => {
                return Err(FtError::AlreadyInTree(path.to_string()));
            }
            Some(node) => node.path().depth() + 1,
            None => 1,
        };

        let depth = path.depth();
        let mut leaf = Some(leaf);
        let mut parent = ancestor;
        let mut first_new = None;
        let mut created = 0;
        for level in start..=depth {
            let built = path.prefix(level).and_then(|prefix| {
                let kind = if level == depth {
                    leaf.take().unwrap_or_else(NodeKind::directory)
                } else {
                    NodeKind::directory()
                };
                self.nodes.insert(prefix, parent, kind)
            });
            match built {
                Ok(id) => {
                    first_new.get_or_insert(id);
                    parent = Some(id);
                    created += 1;
                }
                Err(err) => {
                    if let Some(first) = first_new {
                        let undone = self.nodes.free(first);
                        warn!(
                            "insert {path} failed at depth {level}, rolled back {undone} node(s)"
                        );
                    }
                    return Err(err);
                }
            }
        }

        if self.root.is_none() {
            self.root = first_new;
        }
        self.count += created;
        debug!("inserted {path} ({created} new node(s))");
        Ok(())
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.walk() {
            if let Some(node) = self.nodes.get(id) {
                writeln!(f, "{node}")?;
            }
        }
        Ok(())
    }
}

/// Pre-order iterator returned by [`FileTree::walk`].
pub struct Walk<'a> {
    nodes: &'a Nodes,
    pending: Vec<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let id = self.pending.pop()?;
        if let Some(node) = nodes.get(id) {
            let children = node.children();
            // Pushed in reverse so they pop in path order; files go on top so every file of
            // a directory is emitted before any of its subdirectories.
            self.pending.extend(
                children
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&child| nodes.get(child).is_some_and(|c| c.is_dir())),
            );
            self.pending.extend(
                children
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&child| nodes.get(child).is_some_and(|c| c.is_file())),
            );
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_tree() -> FileTree {
        let mut tree = FileTree::new();
        tree.init().unwrap();
        tree
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn test_new_tree_is_uninitialized() {
            let tree = FileTree::new();
            assert!(!tree.is_initialized());
            assert!(tree.is_empty());
            assert_eq!(tree.render(), None);
            assert_eq!(tree.to_string(), "");
        }

        #[test]
        fn test_init_twice_fails() {
            let mut tree = setup_tree();
            assert_eq!(tree.init(), Err(FtError::Initialization));
            assert!(tree.is_initialized());
        }

        #[test]
        fn test_destroy_requires_init() {
            let mut tree = FileTree::new();
            assert_eq!(tree.destroy(), Err(FtError::Initialization));
        }

        #[test]
        fn test_destroy_empty_tree() -> Result<()> {
            let mut tree = setup_tree();
            tree.destroy()?;
            assert!(!tree.is_initialized());
            Ok(())
        }

        #[test]
        fn test_destroy_frees_everything() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a/b/c")?;
            tree.insert_file("/a/f", Some(b"x".to_vec()))?;
            let old_root = tree.root().unwrap();

            tree.destroy()?;
            assert!(tree.is_empty());
            assert!(tree.nodes().is_empty());
            assert!(tree.nodes().get(old_root).is_none());

            tree.init()?;
            assert_eq!(tree.render().as_deref(), Some(""));
            tree.insert_directory("/other")?;
            assert_eq!(tree.len(), 1);
            Ok(())
        }

        #[test]
        fn test_operations_require_init() {
            let mut tree = FileTree::new();
            assert_eq!(tree.insert_directory("/a"), Err(FtError::Initialization));
            assert_eq!(tree.insert_file("/a/b", None), Err(FtError::Initialization));
            assert_eq!(tree.remove_directory("/a"), Err(FtError::Initialization));
            assert_eq!(tree.remove_file("/a/b"), Err(FtError::Initialization));
            assert_eq!(tree.stat("/a"), Err(FtError::Initialization));
            assert_eq!(
                tree.try_replace_file_contents("/a/b", None),
                Err(FtError::Initialization)
            );
            assert!(!tree.contains_directory("/a"));
            assert!(!tree.contains_file("/a/b"));
            assert_eq!(tree.get_file_contents("/a/b"), None);
        }

        #[test]
        fn test_traverse_toward_requires_init() -> Result<()> {
            let mut tree = FileTree::new();
            let path = FtPath::new("/a")?;
            assert_eq!(tree.traverse_toward(&path), Err(FtError::Initialization));

            tree.init()?;
            assert_eq!(tree.traverse_toward(&path), Ok(None));
            tree.destroy()?;
            assert_eq!(tree.traverse_toward(&path), Err(FtError::Initialization));
            Ok(())
        }
    }

    mod insert {
        use super::*;

        #[test]
        fn test_insert_creates_intermediate_directories() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a/b/c")?;
            assert!(tree.contains_directory("/a"));
            assert!(tree.contains_directory("/a/b"));
            assert!(tree.contains_directory("/a/b/c"));
            assert_eq!(tree.len(), 3);
            assert!(tree.is_valid());
            Ok(())
        }

        #[test]
        fn test_insert_existing_is_rejected_and_harmless() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a/b/c")?;
            let before = tree.render();

            let result = tree.insert_directory("/a/b/c");
            assert!(matches!(result, Err(FtError::AlreadyInTree(_))));
            assert_eq!(tree.len(), 3);
            assert_eq!(tree.render(), before);

            let result = tree.insert_file("/a/b", None);
            assert!(matches!(result, Err(FtError::AlreadyInTree(_))));
            Ok(())
        }

        #[test]
        fn test_insert_over_existing_file_is_not_a_directory() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_file("/a/f", Some(b"keep".to_vec()))?;

            let result = tree.insert_directory("/a/f");
            assert!(matches!(result, Err(FtError::NotADirectory(_))));
            let result = tree.insert_file("/a/f", None);
            assert!(matches!(result, Err(FtError::NotADirectory(_))));

            assert_eq!(tree.len(), 2);
            assert_eq!(tree.get_file_contents("/a/f"), Some(&b"keep"[..]));
            Ok(())
        }

        #[test]
        fn test_root_level_file_conflicts_with_existing_root() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a")?;
            let before = tree.render();

            let result = tree.insert_file("/a", None);
            assert!(matches!(result, Err(FtError::ConflictingPath(_))));
            assert_eq!(tree.len(), 1);
            assert!(tree.contains_directory("/a"));
            assert_eq!(tree.render(), before);
            Ok(())
        }

        #[test]
        fn test_insert_outside_root_conflicts() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a")?;
            let result = tree.insert_directory("/b/c");
            assert!(matches!(result, Err(FtError::ConflictingPath(_))));
            let result = tree.insert_file("/b/c", None);
            assert!(matches!(result, Err(FtError::ConflictingPath(_))));
            assert_eq!(tree.len(), 1);
            Ok(())
        }

        #[test]
        fn test_insert_under_file_fails() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_file("/a/f", Some(b"data".to_vec()))?;
            let result = tree.insert_directory("/a/f/g");
            assert!(matches!(result, Err(FtError::NotADirectory(_))));
            let result = tree.insert_file("/a/f/g/h", None);
            assert!(matches!(result, Err(FtError::NotADirectory(_))));
            assert_eq!(tree.len(), 2);
            Ok(())
        }

        #[test]
        fn test_file_cannot_be_root() {
            let mut tree = setup_tree();
            let result = tree.insert_file("/f", Some(b"x".to_vec()));
            assert!(matches!(result, Err(FtError::ConflictingPath(_))));
            assert!(tree.is_empty());
            assert_eq!(tree.root(), None);
        }

        #[test]
        fn test_insert_file_builds_parents() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_file("/a/b/f", Some(b"hi".to_vec()))?;
            assert!(tree.contains_directory("/a"));
            assert!(tree.contains_directory("/a/b"));
            assert!(tree.contains_file("/a/b/f"));
            assert!(!tree.contains_directory("/a/b/f"));
            assert_eq!(tree.len(), 3);
            Ok(())
        }

        #[test]
        fn test_bad_path_is_reported() {
            let mut tree = setup_tree();
            assert!(matches!(tree.insert_directory("a/b"), Err(FtError::BadPath(_))));
            assert!(matches!(tree.insert_file("/a//b", None), Err(FtError::BadPath(_))));
            assert!(!tree.contains_directory(""));
        }

        #[test]
        fn test_failed_insert_rolls_back() -> Result<()> {
            // room for /a plus two more nodes: the third new level cannot be allocated
            let mut tree = FileTree::with_config(TreeConfig::default().with_node_limit(3));
            tree.init()?;
            tree.insert_directory("/a")?;
            let before = tree.render();

            let result = tree.insert_directory("/a/b/c/d/e");
            assert!(matches!(result, Err(FtError::Memory(_))));
            assert_eq!(tree.len(), 1);
            assert_eq!(tree.nodes().len(), 1);
            assert_eq!(tree.render(), before);
            assert!(!tree.contains_directory("/a/b"));
            assert!(tree.is_valid());

            let result = tree.insert_file("/a/b/c/d/f", Some(vec![0; 4]));
            assert!(matches!(result, Err(FtError::Memory(_))));
            assert_eq!(tree.render(), before);

            tree.insert_directory("/a/b/c")?;
            assert_eq!(tree.len(), 3);
            Ok(())
        }

        #[test]
        fn test_failed_first_insert_leaves_no_root() -> Result<()> {
            let mut tree = FileTree::with_config(TreeConfig::default().with_node_limit(1));
            tree.init()?;
            let result = tree.insert_directory("/a/b");
            assert!(matches!(result, Err(FtError::Memory(_))));
            assert_eq!(tree.root(), None);
            assert!(tree.is_empty());
            assert!(tree.nodes().is_empty());
            Ok(())
        }
    }

    mod remove {
        use super::*;

        #[test]
        fn test_remove_directory_subtree() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a")?;
            tree.insert_file("/a/x", Some(b"hi".to_vec()))?;
            tree.insert_directory("/a/y")?;

            tree.remove_directory("/a")?;
            assert_eq!(tree.len(), 0);
            assert_eq!(tree.root(), None);
            assert!(!tree.contains_file("/a/x"));
            assert!(tree.nodes().is_empty());

            tree.insert_directory("/fresh")?;
            assert_eq!(tree.len(), 1);
            Ok(())
        }

        #[test]
        fn test_remove_inner_directory() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a/b/c")?;
            tree.insert_file("/a/b/f", None)?;
            tree.insert_directory("/a/d")?;

            tree.remove_directory("/a/b")?;
            assert_eq!(tree.len(), 2);
            assert!(tree.contains_directory("/a/d"));
            assert!(!tree.contains_directory("/a/b/c"));
            assert!(tree.is_valid());
            Ok(())
        }

        #[test]
        fn test_kind_mismatch() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a")?;
            tree.insert_file("/a/b", None)?;

            assert!(matches!(tree.remove_file("/a"), Err(FtError::NotAFile(_))));
            assert!(matches!(
                tree.remove_directory("/a/b"),
                Err(FtError::NotADirectory(_))
            ));
            assert_eq!(tree.len(), 2);
            Ok(())
        }

        #[test]
        fn test_remove_file() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_file("/a/b", Some(b"1".to_vec()))?;
            tree.insert_file("/a/c", Some(b"2".to_vec()))?;

            tree.remove_file("/a/b")?;
            assert_eq!(tree.len(), 2);
            assert!(!tree.contains_file("/a/b"));
            assert!(tree.contains_file("/a/c"));
            assert!(tree.is_valid());
            Ok(())
        }

        #[test]
        fn test_remove_missing_paths() -> Result<()> {
            let mut tree = setup_tree();
            assert!(matches!(tree.remove_directory("/a"), Err(FtError::NoSuchPath(_))));

            tree.insert_directory("/a/b")?;
            assert!(matches!(
                tree.remove_directory("/a/c"),
                Err(FtError::NoSuchPath(_))
            ));
            assert!(matches!(
                tree.remove_file("/x/y"),
                Err(FtError::ConflictingPath(_))
            ));
            assert!(matches!(tree.remove_file("/a/b/"), Err(FtError::BadPath(_))));
            Ok(())
        }
    }

    mod query {
        use super::*;

        fn setup_populated() -> FileTree {
            let mut tree = setup_tree();
            tree.insert_directory("/root/docs").unwrap();
            tree.insert_file("/root/docs/a.txt", Some(b"alpha".to_vec()))
                .unwrap();
            tree.insert_file("/root/empty", None).unwrap();
            tree
        }

        #[test]
        fn test_find_exact_and_prefixes() -> Result<()> {
            let tree = setup_populated();
            let id = tree.find("/root/docs")?;
            assert_eq!(tree.nodes().get(id).unwrap().path().pathname(), "/root/docs");
            assert!(matches!(
                tree.find("/root/docs/missing"),
                Err(FtError::NoSuchPath(_))
            ));
            assert!(matches!(tree.find("/other"), Err(FtError::ConflictingPath(_))));
            Ok(())
        }

        #[test]
        fn test_traverse_toward_stops_at_deepest_existing() -> Result<()> {
            let tree = setup_populated();
            let target = FtPath::new("/root/docs/x/y")?;
            let reached = tree.traverse_toward(&target)?.unwrap();
            assert_eq!(tree.nodes().get(reached).unwrap().path().pathname(), "/root/docs");

            let empty = setup_tree();
            assert_eq!(empty.traverse_toward(&target)?, None);
            Ok(())
        }

        #[test]
        fn test_contains_probes() {
            let tree = setup_populated();
            assert!(tree.contains_directory("/root"));
            assert!(tree.contains_file("/root/docs/a.txt"));
            assert!(!tree.contains_file("/root/docs"));
            assert!(!tree.contains_directory("/root/docs/a.txt"));
            assert!(!tree.contains_directory("/elsewhere"));
            assert!(!tree.contains_file("not/a/path"));
        }

        #[test]
        fn test_get_file_contents() {
            let tree = setup_populated();
            assert_eq!(tree.get_file_contents("/root/docs/a.txt"), Some(&b"alpha"[..]));
            assert_eq!(tree.get_file_contents("/root/empty"), None);
            assert_eq!(tree.get_file_contents("/root/docs"), None);
            assert_eq!(tree.get_file_contents("/root/nope"), None);
        }

        #[test]
        fn test_replace_file_contents() -> Result<()> {
            let mut tree = setup_populated();
            let old = tree.replace_file_contents("/root/docs/a.txt", Some(b"beta!".to_vec()));
            assert_eq!(old, Some(b"alpha".to_vec()));
            assert_eq!(tree.get_file_contents("/root/docs/a.txt"), Some(&b"beta!"[..]));

            assert_eq!(tree.replace_file_contents("/root/docs", Some(vec![1])), None);
            assert_eq!(tree.replace_file_contents("/root/missing", Some(vec![1])), None);

            let old = tree.try_replace_file_contents("/root/empty", Some(b"now".to_vec()))?;
            assert_eq!(old, None);
            assert_eq!(tree.stat("/root/empty")?, Stat::File { size: 3 });
            assert!(matches!(
                tree.try_replace_file_contents("/root/docs", None),
                Err(FtError::NotAFile(_))
            ));
            Ok(())
        }

        #[test]
        fn test_stat() -> Result<()> {
            let tree = setup_populated();
            assert_eq!(tree.stat("/root/docs")?, Stat::Directory);
            let stat = tree.stat("/root/docs/a.txt")?;
            assert!(stat.is_file());
            assert_eq!(stat.size(), Some(5));
            assert_eq!(tree.stat("/root/empty")?, Stat::File { size: 0 });
            assert!(matches!(tree.stat("/root/nope"), Err(FtError::NoSuchPath(_))));
            assert!(matches!(tree.stat("/"), Err(FtError::BadPath(_))));
            Ok(())
        }
    }

    mod render {
        use super::*;

        #[test]
        fn test_files_before_directories() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/a")?;
            tree.insert_directory("/a/m")?;
            tree.insert_file("/a/m/q", None)?;
            tree.insert_file("/a/z", None)?;

            assert_eq!(tree.render().unwrap(), "/a\n/a/z\n/a/m\n/a/m/q\n");
            Ok(())
        }

        #[test]
        fn test_siblings_in_path_order() -> Result<()> {
            let mut tree = setup_tree();
            tree.insert_directory("/r/d2")?;
            tree.insert_directory("/r/d1/x")?;
            tree.insert_file("/r/f2", None)?;
            tree.insert_file("/r/f1", None)?;
            tree.insert_file("/r/d1/g", None)?;

            let lines: Vec<_> = tree
                .walk()
                .map(|id| tree.nodes().get(id).unwrap().to_string())
                .collect();
            assert_eq!(
                lines,
                vec!["/r", "/r/f1", "/r/f2", "/r/d1", "/r/d1/g", "/r/d1/x", "/r/d2"]
            );
            assert_eq!(tree.walk().count(), tree.len());
            Ok(())
        }

        #[test]
        fn test_empty_initialized_tree_renders_empty() {
            let tree = setup_tree();
            assert_eq!(tree.render().as_deref(), Some(""));
        }
    }
}
