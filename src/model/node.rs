use super::content::ContentRun;

/// One item of a quantity/keyed value (`<plurals>` in Android resources).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedItem {
    pub key: String,
    pub contents: Vec<ContentRun>,
}

/// The shape of a value node's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// A plain string.
    Simple(Vec<ContentRun>),
    /// An array-like value; one run list per item.
    List(Vec<Vec<ContentRun>>),
    /// A quantity/keyed value.
    Keyed(Vec<KeyedItem>),
}

/// One named resource entry.
///
/// Identity is the `name`: two nodes with the same name are equal regardless
/// of their contents. `Clone` produces a fully independent copy.
#[derive(Debug, Clone)]
pub struct ValueNode {
    pub name: String,
    pub translatable: bool,
    /// Any other attributes of the element (`formatted`, `product`,
    /// `tools:ignore`, ...) in document order, with unescaped values.
    pub attributes: Vec<(String, String)>,
    pub kind: ValueKind,
}

impl ValueNode {
    pub fn simple(name: impl Into<String>, contents: Vec<ContentRun>) -> Self {
        Self {
            name: name.into(),
            translatable: true,
            attributes: Vec::new(),
            kind: ValueKind::Simple(contents),
        }
    }

    pub fn list(name: impl Into<String>, items: Vec<Vec<ContentRun>>) -> Self {
        Self {
            name: name.into(),
            translatable: true,
            attributes: Vec::new(),
            kind: ValueKind::List(items),
        }
    }

    pub fn keyed(name: impl Into<String>, items: Vec<KeyedItem>) -> Self {
        Self {
            name: name.into(),
            translatable: true,
            attributes: Vec::new(),
            kind: ValueKind::Keyed(items),
        }
    }

    #[must_use]
    pub fn with_translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Iterates over every run list of this node (one for simple values,
    /// one per item otherwise).
    pub fn run_lists(&self) -> Vec<&[ContentRun]> {
        match &self.kind {
            ValueKind::Simple(contents) => vec![contents.as_slice()],
            ValueKind::List(items) => items.iter().map(Vec::as_slice).collect(),
            ValueKind::Keyed(items) => items.iter().map(|item| item.contents.as_slice()).collect(),
        }
    }

    /// Mutable counterpart of [`ValueNode::run_lists`].
    pub fn run_lists_mut(&mut self) -> Vec<&mut Vec<ContentRun>> {
        match &mut self.kind {
            ValueKind::Simple(contents) => vec![contents],
            ValueKind::List(items) => items.iter_mut().collect(),
            ValueKind::Keyed(items) => items.iter_mut().map(|item| &mut item.contents).collect(),
        }
    }

    /// Returns `true` if at least one run of this node would be sent to a provider.
    pub fn has_translatable_text(&self) -> bool {
        self.run_lists()
            .into_iter()
            .flatten()
            .any(ContentRun::is_translatable)
    }
}

impl PartialEq for ValueNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ValueNode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_name_only() {
        let a = ValueNode::simple("greeting", vec![ContentRun::text("Hello")]);
        let b = ValueNode::simple("greeting", vec![ContentRun::text("Bonjour")]);
        let c = ValueNode::simple("farewell", vec![ContentRun::text("Hello")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = ValueNode::list(
            "planets",
            vec![vec![ContentRun::text("Mercury")], vec![ContentRun::text("Venus")]],
        );
        let mut copy = original.clone();
        for runs in copy.run_lists_mut() {
            runs[0] = ContentRun::text("changed");
        }

        assert_eq!(original.run_lists()[0][0], ContentRun::text("Mercury"));
        assert_eq!(original.run_lists()[1][0], ContentRun::text("Venus"));
        assert_eq!(copy.run_lists()[1][0], ContentRun::text("changed"));
    }

    #[test]
    fn test_clone_keeps_attributes() {
        let original = ValueNode::simple("pair", vec![ContentRun::text("%s and %s")])
            .with_attributes(vec![("formatted".to_string(), "false".to_string())]);
        let copy = original.clone();
        assert_eq!(copy.attributes, original.attributes);
    }

    #[test]
    fn test_run_lists_for_keyed_values() {
        let node = ValueNode::keyed(
            "songs",
            vec![
                KeyedItem {
                    key: "one".to_string(),
                    contents: vec![ContentRun::text("One song")],
                },
                KeyedItem {
                    key: "other".to_string(),
                    contents: vec![ContentRun::text("Many songs")],
                },
            ],
        );
        assert_eq!(node.run_lists().len(), 2);
        assert!(node.has_translatable_text());
    }

    #[test]
    fn test_has_translatable_text_ignores_blank_and_placeholders() {
        let node = ValueNode::simple(
            "count",
            vec![
                ContentRun::text("  "),
                ContentRun::placeholder("%d", Some("count"), None),
            ],
        );
        assert!(!node.has_translatable_text());
    }
}
