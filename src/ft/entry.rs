#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// What [`FileTree::stat`](crate::FileTree::stat) reports about a path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stat {
    Directory,
    File { size: usize },
}

impl Stat {
    pub fn entry_type(&self) -> EntryType {
        match self {
            Stat::Directory => EntryType::Directory,
            Stat::File { .. } => EntryType::File,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type() == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    /// Content length for files, `None` for directories.
    pub fn size(&self) -> Option<usize> {
        match self {
            Stat::Directory => None,
            Stat::File { size } => Some(*size),
        }
    }
}
