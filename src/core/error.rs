use thiserror::Error;

/// Errors returned by [`FileTree`](crate::FileTree) and its building blocks.
///
/// The kinds are mutually exclusive. Mutating operations surface the precise kind;
/// existence probes (`contains_*`, `get_file_contents`, `replace_file_contents`)
/// fold all of them into `false` / `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FtError {
    /// The tree is not in the lifecycle state the operation requires.
    #[error("file tree is not in the required initialization state")]
    Initialization,

    /// The path string is malformed.
    #[error("bad path: {0}")]
    BadPath(String),

    /// The path lies outside the current root's subtree, or a file was placed at the root.
    #[error("conflicting path: {0}")]
    ConflictingPath(String),

    /// A required node does not exist, or a node was linked at the wrong depth.
    #[error("no such path: {0}")]
    NoSuchPath(String),

    #[error("already in tree: {0}")]
    AlreadyInTree(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    /// Capacity could not be extended, or the configured node limit was reached.
    #[error("memory error: {0}")]
    Memory(String),
}
