use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::error::{TranslationError, TranslationErrorKind};
use super::language::{Lang, all_languages};
use super::registry::{
    PreparedRequest, ProviderDefinition, RequestBody, RequestParts, ResponseError,
};
use super::token::{RemoteSeedSource, TokenKeeper};
use crate::model::is_blank_text;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("strsync/", env!("CARGO_PKG_VERSION"));

/// Something that translates text between two languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Registry key of the underlying provider.
    fn key(&self) -> &str;

    fn supported_languages(&self) -> Vec<Lang>;

    async fn translate(&self, from: &Lang, to: &Lang, text: &str)
    -> Result<String, TranslationError>;
}

/// Resolved settings of one provider for a session.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub key: String,
    pub display_name: String,
    pub needs_app_id: bool,
    pub needs_app_key: bool,
    pub app_id: String,
    pub app_key: String,
    pub supported_languages: Vec<Lang>,
    /// Replaces the definition's base URL (self-hosted or proxy endpoints).
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl ProviderConfig {
    /// Builds a config from a definition with no credentials set.
    pub fn from_definition(definition: &ProviderDefinition) -> Self {
        Self {
            key: definition.key.to_string(),
            display_name: definition.display_name.to_string(),
            needs_app_id: definition.needs_app_id,
            needs_app_key: definition.needs_app_key,
            app_id: String::new(),
            app_key: String::new(),
            supported_languages: all_languages()
                .into_iter()
                .filter(|lang| definition.supports(lang))
                .collect(),
            endpoint: None,
            model: None,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self.app_key = app_key.into();
        self
    }

    /// Names the first credential that is required but empty.
    pub fn missing_credential(&self) -> Option<&'static str> {
        if self.needs_app_id && self.app_id.is_empty() {
            Some("app_id")
        } else if self.needs_app_key && self.app_key.is_empty() {
            Some("app_key")
        } else {
            None
        }
    }
}

/// An HTTP translation provider driven by a [`ProviderDefinition`].
///
/// One request per call, no retries.
pub struct Provider {
    definition: &'static ProviderDefinition,
    config: ProviderConfig,
    client: Client,
    tokens: Option<Arc<TokenKeeper>>,
}

impl Provider {
    pub fn new(definition: &'static ProviderDefinition, config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let tokens = definition.uses_token.then(|| {
            Arc::new(TokenKeeper::new(Box::new(RemoteSeedSource::new(
                client.clone(),
            ))))
        });

        Ok(Self {
            definition,
            config,
            client,
            tokens,
        })
    }

    /// Replaces the token keeper (e.g. with one backed by a fixed seed).
    #[must_use]
    pub fn with_token_keeper(mut self, tokens: Arc<TokenKeeper>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config
            .endpoint
            .as_deref()
            .unwrap_or(self.definition.base_url)
    }

    async fn send(&self, request: PreparedRequest) -> reqwest::Result<(reqwest::StatusCode, String)> {
        let mut http_request = self.client.post(&request.url);
        for (name, value) in &request.headers {
            http_request = http_request.header(*name, value);
        }

        http_request = match &request.body {
            RequestBody::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                http_request
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(encoded)
            }
            RequestBody::Json(value) => http_request.json(value),
        };

        let response = http_request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl Translator for Provider {
    fn key(&self) -> &str {
        &self.config.key
    }

    fn supported_languages(&self) -> Vec<Lang> {
        self.config.supported_languages.clone()
    }

    async fn translate(
        &self,
        from: &Lang,
        to: &Lang,
        text: &str,
    ) -> Result<String, TranslationError> {
        if is_blank_text(text) {
            return Ok(text.to_string());
        }

        if let Some(credential) = self.config.missing_credential() {
            return Err(TranslationError::new(
                TranslationErrorKind::MissingCredential,
                from,
                to,
                text,
                format!("provider '{}' requires {credential}", self.config.key),
            ));
        }

        let provider_from = self.definition.provider_lang(from);
        let provider_to = self.definition.provider_lang(to);

        let token = match &self.tokens {
            Some(tokens) if self.definition.uses_token => Some(tokens.token(text).await),
            _ => None,
        };

        let now = Utc::now();
        let salt = now.timestamp_millis().to_string();
        let curtime = now.timestamp().to_string();
        let model = self
            .config
            .model
            .as_deref()
            .or(self.definition.default_model)
            .unwrap_or_default();

        let request = (self.definition.build)(&RequestParts {
            base_url: self.base_url(),
            from: &provider_from,
            to: &provider_to,
            text,
            app_id: &self.config.app_id,
            app_key: &self.config.app_key,
            token: token.as_deref(),
            salt: &salt,
            curtime: &curtime,
            model,
        });

        debug!(
            provider = self.definition.key,
            url = %request.url,
            from = %provider_from.translation_code,
            to = %provider_to.translation_code,
            "sending translation request"
        );

        let (status, body) = self
            .send(request)
            .await
            .map_err(|e| TranslationError::network(from, to, text, e))?;

        debug!(provider = self.definition.key, %status, "received response");

        match (self.definition.parse)(&body) {
            Ok(translated) if status.is_success() => Ok(translated),
            Err(ResponseError::Rejected(message)) => Err(TranslationError::new(
                TranslationErrorKind::ProviderRejected,
                from,
                to,
                text,
                message,
            )),
            Ok(_) | Err(ResponseError::Malformed(_)) if !status.is_success() => {
                Err(TranslationError::new(
                    TranslationErrorKind::ProviderRejected,
                    from,
                    to,
                    text,
                    format!("HTTP {status}: {}", snippet(&body)),
                ))
            }
            Ok(translated) => Ok(translated),
            Err(ResponseError::Malformed(message)) => Err(TranslationError::new(
                TranslationErrorKind::ParseFailure,
                from,
                to,
                text,
                format!("{message} (body: {})", snippet(&body)),
            )),
        }
    }
}

fn snippet(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((end, _)) => format!("{}...", &trimmed[..end]),
        None => trimmed.to_string(),
    }
}
