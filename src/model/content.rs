//! Content runs: the fragments a value's text is made of.

/// A contiguous fragment of a value's text.
///
/// Concatenating the runs of a value in order reproduces its original text.
/// Only [`ContentRun::Text`] is ever sent to a translation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRun {
    /// Plain translatable text.
    Text(String),
    /// An opaque span (`<xliff:g>`) that keeps its position and content across translation.
    ///
    /// `text` is the inner source of the element as written, markup and entities included.
    Placeholder {
        text: String,
        id: Option<String>,
        example: Option<String>,
    },
    /// Inline markup or CDATA kept verbatim (e.g. `<b>`, `</b>`).
    Markup(String),
}

impl ContentRun {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn placeholder(text: impl Into<String>, id: Option<&str>, example: Option<&str>) -> Self {
        Self::Placeholder {
            text: text.into(),
            id: id.map(str::to_string),
            example: example.map(str::to_string),
        }
    }

    /// Returns `true` for text runs that are empty or whitespace/line breaks only.
    ///
    /// Placeholders and markup are never blank: they are opaque, not empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => is_blank_text(text),
            Self::Placeholder { .. } | Self::Markup(_) => false,
        }
    }

    /// Returns `true` if this run should be submitted for translation.
    pub fn is_translatable(&self) -> bool {
        matches!(self, Self::Text(_)) && !self.is_blank()
    }
}

/// Returns `true` if `text` is empty or consists only of whitespace and line breaks.
pub fn is_blank_text(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Splits `text` into its leading whitespace, trimmed core, and trailing whitespace.
pub fn split_padding(text: &str) -> (&str, &str, &str) {
    let core_start = text.len() - text.trim_start().len();
    let core_end = text.trim_end().len().max(core_start);
    (
        &text[..core_start],
        &text[core_start..core_end],
        &text[core_end..],
    )
}
