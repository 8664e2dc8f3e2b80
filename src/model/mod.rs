//! Typed representation of translatable resource entries.
//!
//! A [`ValueTree`] is an ordered list of [`TreeEntry`] values: named
//! [`ValueNode`]s interleaved with comments and whitespace that are carried
//! through untouched. Each node holds its text as [`ContentRun`]s so that
//! placeholders stay in place while the text around them is translated.

mod content;
mod node;
mod tree;

pub use content::{ContentRun, is_blank_text, split_padding};
pub use node::{KeyedItem, ValueKind, ValueNode};
pub use tree::{TreeEntry, ValueTree};
