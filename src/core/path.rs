//! Validated hierarchical paths.
//!
//! A path is absolute (`/a/b/c`) and is indexed by depth: `/a` has depth 1, `/a/b` depth 2
//! and so on. Paths are ordered byte-wise by their textual form, which is the only ordering
//! key used by the tree.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::{FtError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FtPath {
    pathname: String,
    ends: Vec<usize>, // byte offset just past each segment
}

impl FtPath {
    /// Parses and validates `raw`.
    ///
    /// Rejected with `FtError::BadPath`: an empty string, a missing leading `/`, `/` alone,
    /// a trailing `/`, empty segments (`//`), `.` or `..` segments and NUL bytes.
    pub fn new(raw: &str) -> Result<Self> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(FtError::BadPath(format!("{raw:?} is not absolute")));
        };
        if rest.is_empty() {
            return Err(FtError::BadPath(format!("{raw:?} has no segments")));
        }
        if raw.contains('\0') {
            return Err(FtError::BadPath(format!("{raw:?} contains NUL")));
        }

        let mut ends = Vec::new();
        let mut offset = 1;
        for segment in rest.split('/') {
            if segment.is_empty() {
                return Err(FtError::BadPath(format!("{raw:?} contains an empty segment")));
            }
            if segment == "." || segment == ".." {
                return Err(FtError::BadPath(format!(
                    "{raw:?} contains a relative segment"
                )));
            }
            offset += segment.len();
            ends.push(offset);
            offset += 1;
        }

        Ok(Self {
            pathname: raw.to_string(),
            ends,
        })
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.ends.len()
    }

    /// Returns the ancestor-or-self of this path made of its first `depth` segments.
    pub fn prefix(&self, depth: usize) -> Result<FtPath> {
        if depth == 0 || depth > self.depth() {
            return Err(FtError::NoSuchPath(format!(
                "{} has no prefix of depth {depth}",
                self.pathname
            )));
        }
        let end = self.ends[depth - 1];
        Ok(Self {
            pathname: self.pathname[..end].to_string(),
            ends: self.ends[..depth].to_vec(),
        })
    }

    /// Number of leading segments shared with `other`.
    pub fn shared_prefix_depth(&self, other: &FtPath) -> usize {
        self.segments()
            .zip(other.segments())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Iterates over the segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let mut start = 1;
        self.ends.iter().map(move |&end| {
            let segment = &self.pathname[start..end];
            start = end + 1;
            segment
        })
    }

    /// Last segment.
    pub fn name(&self) -> &str {
        let start = match self.ends.len() {
            1 => 1,
            n => self.ends[n - 2] + 1,
        };
        &self.pathname[start..]
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Length of the textual form in bytes.
    pub fn str_len(&self) -> usize {
        self.pathname.len()
    }

    /// Compares this path with a raw path string under the same order as `Ord`.
    pub fn compare_str(&self, other: &str) -> Ordering {
        self.pathname.as_bytes().cmp(other.as_bytes())
    }
}

impl Ord for FtPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_str(&other.pathname)
    }
}

impl PartialOrd for FtPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for FtPath {
    type Err = FtError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for FtPath {
    fn as_ref(&self) -> &str {
        &self.pathname
    }
}

impl fmt::Display for FtPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pathname)
    }
}
