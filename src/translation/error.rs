use std::fmt;
use thiserror::Error;

use super::language::Lang;

/// What went wrong while translating one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationErrorKind {
    /// The provider needs an app id or key that is not configured. No request was sent.
    MissingCredential,
    /// The request could not be sent or the response could not be read.
    Network,
    /// The provider answered with its own error payload.
    ProviderRejected,
    /// The response body did not have the expected shape.
    ParseFailure,
}

impl fmt::Display for TranslationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingCredential => "missing credential",
            Self::Network => "network error",
            Self::ProviderRejected => "provider rejected the request",
            Self::ParseFailure => "unexpected response",
        };
        f.write_str(label)
    }
}

/// A failed translation of `text` from `from` to `to`.
#[derive(Debug, Error)]
#[error("{kind} while translating {from_code} -> {to_code}: {message}", from_code = .from.code, to_code = .to.code)]
pub struct TranslationError {
    pub kind: TranslationErrorKind,
    pub from: Lang,
    pub to: Lang,
    pub text: String,
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl TranslationError {
    pub fn new(
        kind: TranslationErrorKind,
        from: &Lang,
        to: &Lang,
        text: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            from: from.clone(),
            to: to.clone(),
            text: text.to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn network(from: &Lang, to: &Lang, text: &str, source: reqwest::Error) -> Self {
        Self {
            message: source.to_string(),
            source: Some(source),
            ..Self::new(TranslationErrorKind::Network, from, to, text, String::new())
        }
    }
}
