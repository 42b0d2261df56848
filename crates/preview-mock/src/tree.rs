//! Navigation tree served by `GET /api/tree`

use crate::types::TreeNode;

/// Id of the single top-level node
pub const ROOT_ID: &str = "users-root";

/// Static, two-level navigation tree
///
/// Lookups are keyed by parent id; the tree is not mutable at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTree {
    roots: Vec<TreeNode>,
    children: Vec<(String, Vec<TreeNode>)>,
}

impl NavTree {
    /// Create the default user-management tree
    #[must_use]
    pub fn new() -> Self {
        Self {
            roots: vec![TreeNode::branch(ROOT_ID, "User Management")],
            children: vec![(
                ROOT_ID.to_string(),
                vec![TreeNode::leaf(
                    "users-screen",
                    "Users",
                    "/spec/user-list.screen.json",
                )],
            )],
        }
    }

    /// Children of `parent_id`, or the root level when absent or blank
    ///
    /// Unknown parents have no children.
    #[must_use]
    pub fn children(&self, parent_id: Option<&str>) -> Vec<TreeNode> {
        match parent_id.map(str::trim) {
            None | Some("") => self.roots.clone(),
            Some(id) => self
                .children
                .iter()
                .find(|(parent, _)| parent == id)
                .map(|(_, nodes)| nodes.clone())
                .unwrap_or_default(),
        }
    }

    /// First leaf reachable from the root level, depth first
    #[must_use]
    pub fn first_leaf(&self) -> Option<TreeNode> {
        let mut pending: Vec<TreeNode> = self.roots.iter().rev().cloned().collect();
        while let Some(node) = pending.pop() {
            if node.is_leaf {
                return Some(node);
            }
            pending.extend(self.children(Some(&node.id)).into_iter().rev());
        }
        None
    }
}

impl Default for NavTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parent_returns_root() {
        let tree = NavTree::new();
        let roots = tree.children(None);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, ROOT_ID);
        assert!(!roots[0].is_leaf);
        assert_eq!(tree.children(Some("")), roots);
    }

    #[test]
    fn root_has_users_screen() {
        let children = NavTree::new().children(Some(ROOT_ID));
        assert_eq!(children.len(), 1);
        assert!(children[0].is_leaf);
        assert_eq!(
            children[0].screen_spec_path.as_deref(),
            Some("/spec/user-list.screen.json")
        );
    }

    #[test]
    fn unknown_parent_is_empty() {
        assert!(NavTree::new().children(Some("nope")).is_empty());
    }

    #[test]
    fn first_leaf_walks_depth_first() {
        let leaf = NavTree::new().first_leaf().unwrap();
        assert_eq!(leaf.id, "users-screen");
    }
}
