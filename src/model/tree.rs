use std::collections::HashMap;

use super::node::ValueNode;

/// One entry of a resource tree, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Node(ValueNode),
    /// Comment body without the `<!--`/`-->` delimiters.
    Comment(String),
    /// Whitespace between entries, kept byte for byte.
    Whitespace(String),
    /// Any other element (`<dimen>`, `<color>`, ...) kept as raw source text.
    Raw(String),
}

impl TreeEntry {
    pub const fn as_node(&self) -> Option<&ValueNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// An ordered resource tree: value nodes interleaved with pass-through entries.
///
/// Attributes of the document root (namespace declarations such as
/// `xmlns:tools`) travel with the tree so that raw entries using those
/// prefixes stay valid when written elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueTree {
    root_attributes: Vec<(String, String)>,
    entries: Vec<TreeEntry>,
}

impl ValueTree {
    pub const fn new() -> Self {
        Self {
            root_attributes: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub const fn from_entries(entries: Vec<TreeEntry>) -> Self {
        Self {
            root_attributes: Vec::new(),
            entries,
        }
    }

    #[must_use]
    pub fn with_root_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.root_attributes = attributes;
        self
    }

    pub fn root_attributes(&self) -> &[(String, String)] {
        &self.root_attributes
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ValueNode> {
        self.entries.iter().filter_map(TreeEntry::as_node)
    }

    pub fn node(&self, name: &str) -> Option<&ValueNode> {
        self.nodes().find(|node| node.name == name)
    }

    /// Indexes nodes by name. Later duplicates lose to the first occurrence.
    pub fn index_by_name(&self) -> HashMap<&str, &ValueNode> {
        let mut index = HashMap::new();
        for node in self.nodes() {
            index.entry(node.name.as_str()).or_insert(node);
        }
        index
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentRun;

    fn sample_tree() -> ValueTree {
        ValueTree::from_entries(vec![
            TreeEntry::Whitespace("\n    ".to_string()),
            TreeEntry::Comment(" Greetings ".to_string()),
            TreeEntry::Whitespace("\n    ".to_string()),
            TreeEntry::Node(ValueNode::simple("greeting", vec![ContentRun::text("Hello")])),
            TreeEntry::Whitespace("\n    ".to_string()),
            TreeEntry::Node(ValueNode::simple("farewell", vec![ContentRun::text("Bye")])),
            TreeEntry::Whitespace("\n".to_string()),
        ])
    }

    #[test]
    fn test_nodes_preserve_order() {
        let tree = sample_tree();
        let names: Vec<_> = tree.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["greeting", "farewell"]);
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.entries().len(), 7);
    }

    #[test]
    fn test_index_by_name() {
        let tree = sample_tree();
        let index = tree.index_by_name();
        assert_eq!(index.len(), 2);
        assert!(index.contains_key("farewell"));
        assert!(tree.node("greeting").is_some());
        assert!(tree.node("missing").is_none());
    }

    #[test]
    fn test_clone_does_not_share_structure() {
        let tree = sample_tree();
        let mut copy = tree.clone();
        copy.push(TreeEntry::Comment("extra".to_string()));
        assert_eq!(tree.entries().len(), 7);
        assert_eq!(copy.entries().len(), 8);
    }
}
