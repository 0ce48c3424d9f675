//! Tag hierarchy owned by a catalog
//!
//! Nodes own their children by name. Entities refer to nodes with
//! slash-separated paths from the root (`"places/paris"`).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

/// One node of the tag tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            children: BTreeMap::new(),
        }
    }

    /// The unnamed root every catalog starts with
    pub fn root() -> Self {
        Self::new("root", "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.children.values()
    }

    /// Add (or replace) a child and return it for further nesting.
    pub fn add_node(&mut self, name: &str, title: &str) -> &mut HierarchyNode {
        let node = HierarchyNode::new(name, title);
        match self.children.entry(name.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(node);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(node),
        }
    }

    /// Remove a child and its whole subtree.
    pub fn delete_node(&mut self, name: &str) -> Option<HierarchyNode> {
        self.children.remove(name)
    }

    /// Resolve a slash-separated path below this node.
    ///
    /// The empty path resolves to this node.
    pub fn find(&self, path: &str) -> Option<&HierarchyNode> {
        segments(path).try_fold(self, |node, segment| node.children.get(segment))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut HierarchyNode> {
        segments(path).try_fold(self, |node, segment| node.children.get_mut(segment))
    }

    /// Every descendant path in depth-first, name order.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(self, "", &mut out);
        out
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn collect_paths(node: &HierarchyNode, prefix: &str, out: &mut Vec<String>) {
    for child in node.children.values() {
        let path = if prefix.is_empty() {
            child.name.clone()
        } else {
            format!("{prefix}/{}", child.name)
        };
        out.push(path.clone());
        collect_paths(child, &path, out);
    }
}

impl Default for HierarchyNode {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HierarchyNode {
        let mut root = HierarchyNode::root();
        let places = root.add_node("places", "Places");
        places.add_node("paris", "Paris");
        places.add_node("berlin", "Berlin");
        root.add_node("people", "People");
        root
    }

    #[test]
    fn find_resolves_nested_paths() {
        let root = sample();
        assert_eq!(root.find("places/paris").unwrap().title(), "Paris");
        assert_eq!(root.find("/places/").unwrap().name(), "places");
        assert_eq!(root.find("").unwrap().name(), "root");
        assert!(root.find("places/rome").is_none());
    }

    #[test]
    fn delete_removes_subtree() {
        let mut root = sample();
        let removed = root.delete_node("places").unwrap();
        assert_eq!(removed.children().count(), 2);
        assert!(root.find("places/paris").is_none());
        assert!(root.delete_node("places").is_none());
    }

    #[test]
    fn paths_are_depth_first_in_name_order() {
        assert_eq!(
            sample().paths(),
            vec!["people", "places", "places/berlin", "places/paris"]
        );
    }

    #[test]
    fn find_mut_allows_nesting_deeper() {
        let mut root = sample();
        root.find_mut("places/paris")
            .unwrap()
            .add_node("louvre", "Louvre");
        assert!(root.find("places/paris/louvre").is_some());
    }
}
