//! Structural validation of a [`FileTree`], mainly for tests and debugging.

use log::error;

use crate::ft::{FileTree, NodeId};

impl FileTree {
    /// Checks every structural invariant of the tree.
    ///
    /// * the root exists iff the tree is non-empty, has no parent, is a directory of depth 1;
    /// * every child links back to its parent, sits exactly one level below it and has the
    ///   parent's path as a prefix;
    /// * siblings are strictly ascending by path;
    /// * the node count matches both the reachable nodes and the live nodes of the arena.
    ///
    /// The first violation found is logged at `error` level.
    pub fn is_valid(&self) -> bool {
        match check(self) {
            Ok(()) => true,
            Err(violation) => {
                error!("file tree invariant violated: {violation}");
                false
            }
        }
    }
}

fn check(tree: &FileTree) -> Result<(), String> {
    let nodes = tree.nodes();
    if !tree.is_initialized() && tree.root().is_some() {
        return Err("uninitialized tree holds a root".to_string());
    }

    let Some(root) = tree.root() else {
        if tree.len() != 0 || !nodes.is_empty() {
            return Err(format!(
                "no root but count is {} and {} node(s) are live",
                tree.len(),
                nodes.len()
            ));
        }
        return Ok(());
    };

    let root_node = nodes.get(root).ok_or("root handle is stale")?;
    if root_node.parent().is_some() {
        return Err(format!("root {root_node} has a parent"));
    }
    if !root_node.is_dir() || root_node.path().depth() != 1 {
        return Err(format!("root {root_node} is not a top-level directory"));
    }

    let mut reachable = 0;
    let mut pending: Vec<NodeId> = vec![root];
    while let Some(id) = pending.pop() {
        let node = nodes.get(id).ok_or("child handle is stale")?;
        reachable += 1;

        let children = node.children();
        for &child_id in children {
            let child = nodes
                .get(child_id)
                .ok_or_else(|| format!("{node} links a stale child"))?;
            if child.parent() != Some(id) {
                return Err(format!("{child} does not point back to {node}"));
            }
            let depth = node.path().depth();
            if child.path().depth() != depth + 1
                || child.path().shared_prefix_depth(node.path()) != depth
            {
                return Err(format!("{child} is not a direct child of {node}"));
            }
        }
        for pair in children.windows(2) {
            if let (Some(left), Some(right)) = (nodes.get(pair[0]), nodes.get(pair[1])) {
                if left.compare(right).is_ge() {
                    return Err(format!("children of {node} out of order: {left}, {right}"));
                }
            }
        }
        pending.extend_from_slice(children);
    }

    if reachable != tree.len() || reachable != nodes.len() {
        return Err(format!(
            "{reachable} reachable node(s), count is {}, {} live",
            tree.len(),
            nodes.len()
        ));
    }
    Ok(())
}
