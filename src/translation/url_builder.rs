//! Query-string URL construction.

use url::form_urlencoded::byte_serialize;

/// Appends query parameters to a base URL in call order.
///
/// Repeated keys are all kept, in insertion order. With no parameters,
/// [`UrlBuilder::build`] returns the base URL unchanged.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
    params: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return self.base.clone();
        }

        let query = self
            .params
            .iter()
            .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.base.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.base)
    }
}

fn encode(component: &str) -> String {
    byte_serialize(component.as_bytes()).collect()
}
