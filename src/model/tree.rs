//! Copy-on-edit document tree.
//!
//! Every operation returns a new `Tree` and leaves `self` untouched, so a
//! reader holding the previous value never observes a half-applied edit.
//! Operations that find no target return a tree equal to the input.
//!
//! Lookups are depth-first over the whole tree with no id index, so each
//! operation is linear in the number of nodes.

use std::collections::HashSet;

use super::{Node, StyleMap};

/// Ordered sequence of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    roots: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::size).sum()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Parent of `id`: `None` if absent, `Some(None)` for a root.
    pub fn parent_of(&self, id: &str) -> Option<Option<&str>> {
        let path = locate(&self.roots, id)?;
        let (_, ancestors) = path.split_last()?;
        if ancestors.is_empty() {
            return Some(None);
        }
        let mut list = &self.roots;
        let mut parent = None;
        for &index in ancestors {
            let node = list.get(index)?;
            parent = Some(node.id.as_str());
            list = &node.children;
        }
        Some(parent)
    }

    // =========================================================================
    // Structural operations
    // =========================================================================

    /// Append `node` to the end of the root sequence.
    pub fn insert_root(&self, node: Node) -> Tree {
        if self.collides(&node) {
            return self.clone();
        }
        let mut roots = self.roots.clone();
        roots.push(node);
        Tree { roots }
    }

    /// Append `node` as the last child of `parent_id`.
    pub fn insert_as_child(&self, parent_id: &str, mut node: Node) -> Tree {
        if self.collides(&node) {
            return self.clone();
        }
        node.parent = Some(parent_id.to_owned());
        self.edit_at(parent_id, |siblings, index| {
            siblings[index].children.push(node);
        })
    }

    /// Insert `node` immediately after `after_id`, under the same parent.
    pub fn insert_as_sibling(&self, after_id: &str, node: Node) -> Tree {
        if self.collides(&node) {
            return self.clone();
        }
        self.edit_at(after_id, |siblings, index| {
            siblings.insert(index + 1, node);
        })
    }

    /// Remove `id` together with its whole subtree.
    pub fn remove(&self, id: &str) -> Tree {
        self.edit_at(id, |siblings, index| {
            siblings.remove(index);
        })
    }

    /// Shallow-merge `styles` into the style map of `id`.
    pub fn update_style(&self, id: &str, styles: &StyleMap) -> Tree {
        self.edit_at(id, |siblings, index| {
            let css = &mut siblings[index].css;
            for (property, value) in styles {
                css.insert(property.clone(), value.clone());
            }
        })
    }

    /// Relocate the subtree at `id` to the end of `new_parent`'s children,
    /// or to the end of the root sequence when `new_parent` is `None`.
    ///
    /// No-op when either id is missing or the destination lies inside the
    /// moved subtree.
    pub fn move_node(&self, id: &str, new_parent: Option<&str>) -> Tree {
        let Some(moving) = self.find(id) else {
            return self.clone();
        };
        if let Some(parent_id) = new_parent
            && (moving.find(parent_id).is_some() || !self.contains(parent_id))
        {
            return self.clone();
        }

        let mut moving = moving.clone();
        moving.parent = new_parent.map(str::to_owned);
        let pruned = self.remove(id);
        match new_parent {
            Some(parent_id) => pruned.edit_at(parent_id, |siblings, index| {
                siblings[index].children.push(moving);
            }),
            None => {
                let mut roots = pruned.roots;
                roots.push(moving);
                Tree { roots }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Copy the tree and run `edit` on the sibling list holding `id`.
    fn edit_at(&self, id: &str, edit: impl FnOnce(&mut Vec<Node>, usize)) -> Tree {
        let Some(path) = locate(&self.roots, id) else {
            return self.clone();
        };
        let Some((&index, ancestors)) = path.split_last() else {
            return self.clone();
        };

        let mut roots = self.roots.clone();
        let mut siblings = &mut roots;
        for &step in ancestors {
            siblings = &mut siblings[step].children;
        }
        edit(siblings, index);
        Tree { roots }
    }

    /// Whether any id in `node`'s subtree already exists in the tree or
    /// repeats within the subtree.
    fn collides(&self, node: &Node) -> bool {
        let mut existing = HashSet::new();
        for root in &self.roots {
            root.walk(&mut |n| {
                existing.insert(n.id.as_str());
            });
        }
        let mut collision = false;
        node.walk(&mut |n| collision |= !existing.insert(n.id.as_str()));
        collision
    }
}

impl From<Vec<Node>> for Tree {
    fn from(roots: Vec<Node>) -> Self {
        Self::from_roots(roots)
    }
}

/// Index path from the root sequence down to `id`, depth-first.
fn locate(nodes: &[Node], id: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id == id {
            return Some(vec![index]);
        }
        if let Some(mut path) = locate(&node.children, id) {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: &str) -> Node {
        Node::with_id(id, kind, kind)
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn sample() -> Tree {
        Tree::new()
            .insert_root(node("a", "div"))
            .insert_as_child("a", node("b", "span"))
            .insert_as_child("a", node("c", "p"))
            .insert_root(node("d", "section"))
    }

    #[test]
    fn test_insert_root_appends() {
        let tree = sample();
        assert_eq!(ids(tree.roots()), ["a", "d"]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_insert_as_child_preserves_order_and_sets_parent() {
        let tree = sample().insert_as_child("b", node("e", "em"));
        let a = tree.find("a").unwrap();
        assert_eq!(ids(&a.children), ["b", "c"]);
        let b = tree.find("b").unwrap();
        assert_eq!(ids(&b.children), ["e"]);
        assert_eq!(b.children[0].parent.as_deref(), Some("b"));
    }

    #[test]
    fn test_insert_as_child_missing_parent_is_noop() {
        let tree = sample();
        assert_eq!(tree.insert_as_child("nope", node("x", "div")), tree);
    }

    #[test]
    fn test_insert_as_sibling_at_depth() {
        let tree = sample().insert_as_sibling("b", node("x", "i"));
        assert_eq!(ids(&tree.find("a").unwrap().children), ["b", "x", "c"]);

        let tree = tree.insert_as_sibling("a", node("y", "div"));
        assert_eq!(ids(tree.roots()), ["a", "y", "d"]);
    }

    #[test]
    fn test_insert_as_sibling_missing_is_noop() {
        let tree = sample();
        assert_eq!(tree.insert_as_sibling("nope", node("x", "div")), tree);
    }

    #[test]
    fn test_duplicate_id_insert_is_noop() {
        let tree = sample();
        assert_eq!(tree.insert_root(node("b", "div")), tree);
        assert_eq!(
            tree.insert_as_child("d", node("fresh", "div").child(node("c", "p"))),
            tree
        );
        assert_eq!(tree.insert_as_sibling("a", node("d", "div")), tree);
    }

    #[test]
    fn test_remove_prunes_subtree() {
        let tree = sample().insert_as_child("b", node("e", "em"));
        let pruned = tree.remove("b");
        assert!(!pruned.contains("b"));
        assert!(!pruned.contains("e"));
        assert_eq!(pruned.len(), 3);
        assert_eq!(tree.len(), 5, "original tree is untouched");
    }

    #[test]
    fn test_insert_then_remove_restores_tree() {
        let before = sample();
        let after = before
            .insert_as_child("c", node("n", "span"))
            .remove("n");
        assert_eq!(after, before);
    }

    #[test]
    fn test_update_style_merges() {
        let a: StyleMap = [("a".to_string(), "1".to_string())].into();
        let b: StyleMap = [("b".to_string(), "2".to_string())].into();
        let tree = sample().update_style("c", &a).update_style("c", &b);
        let css = &tree.find("c").unwrap().css;
        assert_eq!(css.get("a").map(String::as_str), Some("1"));
        assert_eq!(css.get("b").map(String::as_str), Some("2"));

        let over: StyleMap = [("a".to_string(), "3".to_string())].into();
        let tree = tree.update_style("c", &over);
        let css = &tree.find("c").unwrap().css;
        assert_eq!(css.get("a").map(String::as_str), Some("3"));
        assert_eq!(css.len(), 2);
    }

    #[test]
    fn test_absent_targets_are_noops() {
        let tree = sample();
        let styles: StyleMap = [("color".to_string(), "red".to_string())].into();
        assert_eq!(tree.update_style("zz", &styles), tree);
        assert_eq!(tree.remove("zz"), tree);
        assert_eq!(tree.move_node("zz", None), tree);
    }

    #[test]
    fn test_move_node() {
        let tree = sample().move_node("b", Some("d"));
        assert_eq!(ids(&tree.find("a").unwrap().children), ["c"]);
        let d = tree.find("d").unwrap();
        assert_eq!(ids(&d.children), ["b"]);
        assert_eq!(d.children[0].parent.as_deref(), Some("d"));

        let tree = tree.move_node("b", None);
        assert_eq!(ids(tree.roots()), ["a", "d", "b"]);
        assert_eq!(tree.find("b").unwrap().parent, None);
    }

    #[test]
    fn test_move_into_own_subtree_is_noop() {
        let tree = sample().insert_as_child("b", node("e", "em"));
        assert_eq!(tree.move_node("a", Some("e")), tree);
        assert_eq!(tree.move_node("a", Some("a")), tree);
        assert_eq!(tree.move_node("a", Some("missing")), tree);
    }

    #[test]
    fn test_parent_of() {
        let tree = sample();
        assert_eq!(tree.parent_of("a"), Some(None));
        assert_eq!(tree.parent_of("c"), Some(Some("a")));
        assert_eq!(tree.parent_of("zz"), None);
    }
}
