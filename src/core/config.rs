/// Tuning knobs for a [`FileTree`](crate::FileTree).
///
/// ### Example
/// ```
/// use ft_kit::{FileTree, TreeConfig};
///
/// let config = TreeConfig::default()
///     .with_node_limit(1024)
///     .with_children_capacity(4);
/// let tree = FileTree::with_config(config);
/// assert_eq!(tree.config().node_limit, Some(1024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeConfig {
    /// Maximum number of live nodes. Inserting past it fails with `FtError::Memory`.
    /// `None` means unlimited.
    pub node_limit: Option<usize>,
    /// Capacity reserved up front for the children of every new directory.
    pub children_capacity: usize,
}

impl TreeConfig {
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_children_capacity(mut self, capacity: usize) -> Self {
        self.children_capacity = capacity;
        self
    }
}
