//! Parsing and rendering of Android `<resources>` documents.

use quick_xml::Reader;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as _;

use super::ResourceError;
use crate::model::{ContentRun, KeyedItem, TreeEntry, ValueKind, ValueNode, ValueTree};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";
const ITEM_INDENT: &str = "\n        ";
const CLOSE_INDENT: &str = "\n    ";
/// Attributes modelled as fields of [`ValueNode`] rather than kept in its attribute list.
const NODE_FIELDS: &[&str] = &["name", "translatable"];

/// Parses the children of the `<resources>` root into a [`ValueTree`].
///
/// `<string>`, `<string-array>` and `<plurals>` become nodes. Comments and
/// whitespace between them are kept as pass-through entries, and any other
/// element is kept verbatim as a raw entry. Attributes of the root element are
/// kept on the tree. Content outside the root element is dropped.
pub fn parse_resources(source: &str) -> Result<ValueTree, ResourceError> {
    let mut parser = Parser::new(source);
    let mut tree = ValueTree::new();
    let mut root_attributes = Vec::new();
    let mut seen_root = false;
    let mut inside_root = false;

    loop {
        let (start, event) = parser.next()?;
        match event {
            Event::Start(e) if !inside_root => {
                if e.name().as_ref() != b"resources" {
                    return Err(ResourceError::Malformed(format!(
                        "expected <resources> root, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                root_attributes = parser.attributes(&e, &[])?;
                seen_root = true;
                inside_root = true;
            }
            Event::Empty(e) if !inside_root && e.name().as_ref() == b"resources" => {
                root_attributes = parser.attributes(&e, &[])?;
                seen_root = true;
            }
            Event::End(_) if inside_root => inside_root = false,
            Event::Start(e) if inside_root => {
                let entry = parser.element(start, &e)?;
                tree.push(entry);
            }
            Event::Empty(e) if inside_root => {
                let entry = if e.name().as_ref() == b"string" {
                    TreeEntry::Node(parser.node(&e, |name| ValueNode::simple(name, Vec::new()))?)
                } else {
                    TreeEntry::Raw(parser.slice(start).to_string())
                };
                tree.push(entry);
            }
            Event::Text(_) if inside_root => {
                let raw = parser.slice(start);
                if raw.chars().all(char::is_whitespace) {
                    tree.push(TreeEntry::Whitespace(raw.to_string()));
                } else {
                    tree.push(TreeEntry::Raw(raw.to_string()));
                }
            }
            Event::Comment(text) if inside_root => {
                tree.push(TreeEntry::Comment(String::from_utf8_lossy(&text).into_owned()));
            }
            Event::CData(_) | Event::PI(_) if inside_root => {
                tree.push(TreeEntry::Raw(parser.slice(start).to_string()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ResourceError::Malformed("missing <resources> root element".to_string()));
    }
    if inside_root {
        return Err(ResourceError::Malformed("unterminated <resources> element".to_string()));
    }

    Ok(tree.with_root_attributes(root_attributes))
}

struct Parser<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            reader: Reader::from_str(source),
        }
    }

    fn position(&self) -> usize {
        usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX)
    }

    /// Reads the next event together with the byte offset it started at.
    fn next(&mut self) -> Result<(usize, Event<'a>), ResourceError> {
        let start = self.position();
        let event = self.reader.read_event().map_err(|e| self.error(e))?;
        Ok((start, event))
    }

    fn error(&self, source: impl Into<quick_xml::Error>) -> ResourceError {
        ResourceError::Xml {
            position: self.reader.error_position(),
            source: source.into(),
        }
    }

    /// Source text from `start` up to the current position.
    fn slice(&self, start: usize) -> &'a str {
        self.source.get(start..self.position()).unwrap_or_default()
    }

    fn attribute(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<String>, ResourceError> {
        let Some(attr) = e.try_get_attribute(name).map_err(|err| self.error(err))? else {
            return Ok(None);
        };
        let value = attr.unescape_value().map_err(|err| self.error(err))?;
        Ok(Some(value.into_owned()))
    }

    /// Every attribute of `e` not named in `skip`, in document order.
    fn attributes(
        &self,
        e: &BytesStart<'_>,
        skip: &[&str],
    ) -> Result<Vec<(String, String)>, ResourceError> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error(err))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if skip.contains(&key.as_str()) {
                continue;
            }
            let value = attr.unescape_value().map_err(|err| self.error(err))?;
            attributes.push((key, value.into_owned()));
        }
        Ok(attributes)
    }

    fn required_name(&self, e: &BytesStart<'_>) -> Result<String, ResourceError> {
        self.attribute(e, "name")?.ok_or_else(|| {
            ResourceError::Malformed(format!(
                "<{}> without a name attribute",
                String::from_utf8_lossy(e.name().as_ref())
            ))
        })
    }

    fn translatable(&self, e: &BytesStart<'_>) -> Result<bool, ResourceError> {
        Ok(self.attribute(e, "translatable")?.as_deref() != Some("false"))
    }

    fn element(&mut self, start: usize, e: &BytesStart<'a>) -> Result<TreeEntry, ResourceError> {
        let node = match e.name().as_ref() {
            b"string" => {
                let runs = self.runs()?;
                self.node(e, |name| ValueNode::simple(name, runs))?
            }
            b"string-array" => {
                let items: Vec<_> = self.items()?.into_iter().map(|(_, runs)| runs).collect();
                self.node(e, |name| ValueNode::list(name, items))?
            }
            b"plurals" => {
                let mut items = Vec::new();
                for (quantity, contents) in self.items()? {
                    let key = quantity.ok_or_else(|| {
                        ResourceError::Malformed("plurals <item> without a quantity".to_string())
                    })?;
                    items.push(KeyedItem { key, contents });
                }
                self.node(e, |name| ValueNode::keyed(name, items))?
            }
            _ => {
                self.reader.read_to_end(e.name()).map_err(|err| self.error(err))?;
                return Ok(TreeEntry::Raw(self.slice(start).to_string()));
            }
        };
        Ok(TreeEntry::Node(node))
    }

    /// Builds a node from the attributes of its element.
    fn node(
        &self,
        e: &BytesStart<'_>,
        build: impl FnOnce(String) -> ValueNode,
    ) -> Result<ValueNode, ResourceError> {
        Ok(build(self.required_name(e)?)
            .with_translatable(self.translatable(e)?)
            .with_attributes(self.attributes(e, NODE_FIELDS)?))
    }

    /// Reads `<item>` children up to the closing tag of the enclosing array.
    fn items(&mut self) -> Result<Vec<(Option<String>, Vec<ContentRun>)>, ResourceError> {
        let mut items = Vec::new();
        loop {
            let (_, event) = self.next()?;
            match event {
                Event::Start(e) if e.name().as_ref() == b"item" => {
                    let quantity = self.attribute(&e, "quantity")?;
                    items.push((quantity, self.runs()?));
                }
                Event::Empty(e) if e.name().as_ref() == b"item" => {
                    items.push((self.attribute(&e, "quantity")?, Vec::new()));
                }
                Event::Start(e) => {
                    self.reader.read_to_end(e.name()).map_err(|err| self.error(err))?;
                }
                Event::End(_) => return Ok(items),
                Event::Eof => {
                    return Err(ResourceError::Malformed("unterminated array element".to_string()));
                }
                _ => {}
            }
        }
    }

    /// Reads the mixed content of a value up to its closing tag.
    fn runs(&mut self) -> Result<Vec<ContentRun>, ResourceError> {
        let mut runs = Vec::new();
        let mut depth = 0usize;

        loop {
            let (start, event) = self.next()?;
            match event {
                Event::Text(text) => {
                    let text = text.unescape().map_err(|err| self.error(err))?;
                    push_text(&mut runs, &unescape_apostrophes(&text));
                }
                Event::Start(e) if is_placeholder(&e) => {
                    let id = self.attribute(&e, "id")?;
                    let example = self.attribute(&e, "example")?;
                    let span = self.reader.read_to_end(e.name()).map_err(|err| self.error(err))?;
                    let inner = usize::try_from(span.start)
                        .ok()
                        .zip(usize::try_from(span.end).ok())
                        .and_then(|(from, to)| self.source.get(from..to))
                        .unwrap_or_default();
                    runs.push(ContentRun::placeholder(inner, id.as_deref(), example.as_deref()));
                }
                Event::Empty(e) if is_placeholder(&e) => {
                    let id = self.attribute(&e, "id")?;
                    let example = self.attribute(&e, "example")?;
                    runs.push(ContentRun::placeholder("", id.as_deref(), example.as_deref()));
                }
                Event::Start(_) => {
                    depth += 1;
                    runs.push(ContentRun::Markup(self.slice(start).to_string()));
                }
                Event::End(_) if depth == 0 => return Ok(runs),
                Event::End(_) => {
                    depth -= 1;
                    runs.push(ContentRun::Markup(self.slice(start).to_string()));
                }
                Event::Empty(_) | Event::CData(_) | Event::Comment(_) => {
                    runs.push(ContentRun::Markup(self.slice(start).to_string()));
                }
                Event::Eof => {
                    return Err(ResourceError::Malformed("unterminated value element".to_string()));
                }
                _ => {}
            }
        }
    }
}

fn is_placeholder(e: &BytesStart<'_>) -> bool {
    e.name().as_ref() == b"xliff:g"
}

fn push_text(runs: &mut Vec<ContentRun>, text: &str) {
    if let Some(ContentRun::Text(previous)) = runs.last_mut() {
        previous.push_str(text);
    } else {
        runs.push(ContentRun::text(text));
    }
}

/// Android requires apostrophes in values to be backslash-escaped.
fn unescape_apostrophes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_apostrophes(text: &str) -> String {
    text.replace('\'', "\\'")
}

/// Renders a tree back to a complete `strings.xml` document.
pub fn render_resources(tree: &ValueTree) -> String {
    let needs_xliff = tree.nodes().any(|node| {
        node.run_lists()
            .iter()
            .any(|runs| runs.iter().any(|run| matches!(run, ContentRun::Placeholder { .. })))
    });
    let laid_out = tree
        .entries()
        .iter()
        .any(|entry| matches!(entry, TreeEntry::Whitespace(_)));

    let declares_xliff = tree
        .root_attributes()
        .iter()
        .any(|(key, _)| key == "xmlns:xliff");

    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str("<resources");
    render_attributes(&mut out, tree.root_attributes());
    if needs_xliff && !declares_xliff {
        let _ = write!(out, r#" xmlns:xliff="{XLIFF_NAMESPACE}""#);
    }
    out.push('>');

    for entry in tree.entries() {
        if !laid_out {
            out.push_str(CLOSE_INDENT);
        }
        match entry {
            TreeEntry::Node(node) => render_node(&mut out, node),
            TreeEntry::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            TreeEntry::Whitespace(text) | TreeEntry::Raw(text) => out.push_str(text),
        }
    }

    if !laid_out {
        out.push('\n');
    }
    out.push_str("</resources>\n");
    out
}

fn render_node(out: &mut String, node: &ValueNode) {
    let tag = match node.kind {
        ValueKind::Simple(_) => "string",
        ValueKind::List(_) => "string-array",
        ValueKind::Keyed(_) => "plurals",
    };
    let _ = write!(out, r#"<{tag} name="{}""#, escape(node.name.as_str()));
    if !node.translatable {
        out.push_str(r#" translatable="false""#);
    }
    render_attributes(out, &node.attributes);
    out.push('>');

    match &node.kind {
        ValueKind::Simple(runs) => render_runs(out, runs),
        ValueKind::List(items) => {
            for runs in items {
                out.push_str(ITEM_INDENT);
                out.push_str("<item>");
                render_runs(out, runs);
                out.push_str("</item>");
            }
            out.push_str(CLOSE_INDENT);
        }
        ValueKind::Keyed(items) => {
            for item in items {
                out.push_str(ITEM_INDENT);
                let _ = write!(out, r#"<item quantity="{}">"#, escape(item.key.as_str()));
                render_runs(out, &item.contents);
                out.push_str("</item>");
            }
            out.push_str(CLOSE_INDENT);
        }
    }

    let _ = write!(out, "</{tag}>");
}

fn render_attributes(out: &mut String, attributes: &[(String, String)]) {
    for (key, value) in attributes {
        let _ = write!(out, r#" {key}="{}""#, escape(value.as_str()));
    }
}

fn render_runs(out: &mut String, runs: &[ContentRun]) {
    for run in runs {
        match run {
            ContentRun::Text(text) => out.push_str(&escape_apostrophes(&partial_escape(text.as_str()))),
            ContentRun::Markup(raw) => out.push_str(raw),
            ContentRun::Placeholder { text, id, example } => {
                out.push_str("<xliff:g");
                if let Some(id) = id {
                    let _ = write!(out, r#" id="{}""#, escape(id.as_str()));
                }
                if let Some(example) = example {
                    let _ = write!(out, r#" example="{}""#, escape(example.as_str()));
                }
                let _ = write!(out, ">{text}</xliff:g>");
            }
        }
    }
}
