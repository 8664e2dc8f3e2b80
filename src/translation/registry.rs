//! Provider definitions.
//!
//! Every provider is a [`ProviderDefinition`] record: credential needs, base
//! URL, language support, and two strategy functions, one building the signed
//! request and one reading the response. Adding a provider means adding a
//! record here, not a new type.

use serde::Deserialize;
use serde_json::{Value, json};

use super::language::Lang;
use super::prompt::build_system_prompt;
use super::signing::{SignHash, SignInput, sign};
use super::url_builder::UrlBuilder;

/// Everything a request builder needs for one translation.
#[derive(Debug, Clone)]
pub struct RequestParts<'a> {
    pub base_url: &'a str,
    /// Source language with the provider's code applied.
    pub from: &'a Lang,
    /// Target language with the provider's code applied.
    pub to: &'a Lang,
    pub text: &'a str,
    pub app_id: &'a str,
    pub app_key: &'a str,
    /// Rotating seed token, for providers that use one.
    pub token: Option<&'a str>,
    /// Millisecond timestamp.
    pub salt: &'a str,
    /// Second timestamp.
    pub curtime: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Form(Vec<(String, String)>),
    Json(Value),
}

/// A fully built POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: RequestBody,
}

/// Why a response body did not yield a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The provider reported an error in its payload.
    Rejected(String),
    /// The payload did not have the expected shape.
    Malformed(String),
}

pub type RequestBuilder = fn(&RequestParts<'_>) -> PreparedRequest;
pub type ResponseParser = fn(&str) -> Result<String, ResponseError>;

/// A translation provider described as data.
#[derive(Debug)]
pub struct ProviderDefinition {
    pub key: &'static str,
    pub display_name: &'static str,
    pub needs_app_id: bool,
    pub needs_app_key: bool,
    pub base_url: &'static str,
    /// Whether requests carry a rotating seed token.
    pub uses_token: bool,
    /// Supported resource codes; `None` means the whole catalog.
    pub languages: Option<&'static [&'static str]>,
    /// Resource code to provider code overrides.
    pub code_overrides: &'static [(&'static str, &'static str)],
    pub default_model: Option<&'static str>,
    pub build: RequestBuilder,
    pub parse: ResponseParser,
}

impl ProviderDefinition {
    /// Returns the language as this provider names it.
    pub fn provider_lang(&self, lang: &Lang) -> Lang {
        self.code_overrides
            .iter()
            .find(|(code, _)| *code == lang.code)
            .map_or_else(|| lang.clone(), |(_, code)| lang.with_translation_code(code))
    }

    pub fn supports(&self, lang: &Lang) -> bool {
        self.languages
            .is_none_or(|codes| codes.contains(&lang.code.as_str()))
    }
}

pub const DEFAULT_PROVIDER: &str = "google";

pub static PROVIDERS: &[ProviderDefinition] = &[
    ProviderDefinition {
        key: "google",
        display_name: "Google Translate",
        needs_app_id: false,
        needs_app_key: false,
        base_url: "https://translate.googleapis.com/translate_a/single",
        uses_token: true,
        languages: None,
        code_overrides: &[],
        default_model: None,
        build: build_google,
        parse: parse_google,
    },
    ProviderDefinition {
        key: "baidu",
        display_name: "Baidu Translate",
        needs_app_id: true,
        needs_app_key: true,
        base_url: "https://fanyi-api.baidu.com/api/trans/vip/translate",
        uses_token: false,
        languages: Some(&[
            "en", "zh-rCN", "zh-rTW", "zh-rHK", "ja", "ko", "fr", "es", "th", "ar", "ru", "pt",
            "de", "it", "el", "nl", "pl", "bg", "et", "da", "fi", "cs", "ro", "sl", "sv", "hu",
            "vi",
        ]),
        code_overrides: &[
            ("ar", "ara"),
            ("bg", "bul"),
            ("da", "dan"),
            ("es", "spa"),
            ("et", "est"),
            ("fi", "fin"),
            ("fr", "fra"),
            ("ja", "jp"),
            ("ko", "kor"),
            ("ro", "rom"),
            ("sl", "slo"),
            ("sv", "swe"),
            ("vi", "vie"),
            ("zh-rCN", "zh"),
            ("zh-rTW", "cht"),
            ("zh-rHK", "cht"),
        ],
        default_model: None,
        build: build_baidu,
        parse: parse_baidu,
    },
    ProviderDefinition {
        key: "youdao",
        display_name: "Youdao Translate",
        needs_app_id: true,
        needs_app_key: true,
        base_url: "https://openapi.youdao.com/api",
        uses_token: false,
        languages: None,
        code_overrides: &[
            ("zh-rCN", "zh-CHS"),
            ("zh-rTW", "zh-CHT"),
            ("zh-rHK", "zh-CHT"),
            ("iw", "he"),
            ("nb", "no"),
            ("pt-rBR", "pt"),
        ],
        default_model: None,
        build: build_youdao,
        parse: parse_youdao,
    },
    ProviderDefinition {
        key: "microsoft",
        display_name: "Microsoft Translator",
        needs_app_id: false,
        needs_app_key: true,
        base_url: "https://api.cognitive.microsofttranslator.com/translate",
        uses_token: false,
        languages: None,
        code_overrides: &[
            ("zh-rCN", "zh-Hans"),
            ("zh-rTW", "zh-Hant"),
            ("zh-rHK", "zh-Hant"),
            ("iw", "he"),
            ("nb", "nb"),
            ("fil", "fil"),
            ("pt-rBR", "pt"),
        ],
        default_model: None,
        build: build_microsoft,
        parse: parse_microsoft,
    },
    ProviderDefinition {
        key: "deepl",
        display_name: "DeepL",
        needs_app_id: false,
        needs_app_key: true,
        base_url: "https://api-free.deepl.com/v2/translate",
        uses_token: false,
        languages: Some(&[
            "bg", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr", "hu", "in", "it", "ja",
            "ko", "lt", "lv", "nb", "nl", "pl", "pt", "pt-rBR", "ro", "ru", "sk", "sl", "sv",
            "tr", "uk", "zh-rCN",
        ]),
        code_overrides: &[
            ("en", "en-US"),
            ("pt", "pt-PT"),
            ("zh-rCN", "zh"),
            ("nb", "nb"),
        ],
        default_model: None,
        build: build_deepl,
        parse: parse_deepl,
    },
    ProviderDefinition {
        key: "openai",
        display_name: "OpenAI",
        needs_app_id: false,
        needs_app_key: true,
        base_url: "https://api.openai.com/v1/chat/completions",
        uses_token: false,
        languages: None,
        code_overrides: &[],
        default_model: Some("gpt-4o-mini"),
        build: build_openai,
        parse: parse_openai,
    },
];

/// Looks up a provider definition by key.
pub fn find_provider(key: &str) -> Option<&'static ProviderDefinition> {
    PROVIDERS.iter().find(|definition| definition.key == key)
}

pub fn provider_keys() -> Vec<&'static str> {
    PROVIDERS.iter().map(|definition| definition.key).collect()
}

fn form(pairs: &[(&str, &str)]) -> RequestBody {
    RequestBody::Form(
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect(),
    )
}

fn malformed(err: &serde_json::Error) -> ResponseError {
    ResponseError::Malformed(format!("invalid response body: {err}"))
}

fn build_google(parts: &RequestParts<'_>) -> PreparedRequest {
    let mut url = UrlBuilder::new(parts.base_url)
        .param("sl", &parts.from.translation_code)
        .param("tl", &parts.to.translation_code)
        .param("client", "gtx")
        .param("dt", "t")
        .param("ie", "UTF-8")
        .param("oe", "UTF-8");
    if let Some(token) = parts.token {
        url = url.param("tk", token);
    }

    PreparedRequest {
        url: url.build(),
        headers: Vec::new(),
        body: form(&[("q", parts.text)]),
    }
}

/// Reads `[[["translated", "source", ...], ...], ...]`.
fn parse_google(body: &str) -> Result<String, ResponseError> {
    let value: Value = serde_json::from_str(body).map_err(|e| malformed(&e))?;
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ResponseError::Malformed("missing translation segments".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

fn build_baidu(parts: &RequestParts<'_>) -> PreparedRequest {
    let signature = sign(
        SignHash::Md5,
        &SignInput {
            app_id: parts.app_id,
            secret: parts.app_key,
            text: parts.text,
            salt: parts.salt,
            curtime: None,
            truncate: false,
        },
    );

    PreparedRequest {
        url: parts.base_url.to_string(),
        headers: Vec::new(),
        body: form(&[
            ("q", parts.text),
            ("from", &parts.from.translation_code),
            ("to", &parts.to.translation_code),
            ("appid", parts.app_id),
            ("salt", parts.salt),
            ("sign", &signature),
        ]),
    }
}

#[derive(Deserialize)]
struct BaiduResponse {
    error_code: Option<Value>,
    error_msg: Option<String>,
    trans_result: Option<Vec<BaiduItem>>,
}

#[derive(Deserialize)]
struct BaiduItem {
    dst: String,
}

fn parse_baidu(body: &str) -> Result<String, ResponseError> {
    let response: BaiduResponse = serde_json::from_str(body).map_err(|e| malformed(&e))?;

    if let Some(code) = response.error_code {
        let code = code.as_str().map_or_else(|| code.to_string(), str::to_string);
        if code != "52000" {
            return Err(ResponseError::Rejected(format!(
                "error {code}: {}",
                response.error_msg.unwrap_or_default()
            )));
        }
    }

    let items = response
        .trans_result
        .ok_or_else(|| ResponseError::Malformed("missing trans_result".to_string()))?;
    Ok(items
        .into_iter()
        .map(|item| item.dst)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn build_youdao(parts: &RequestParts<'_>) -> PreparedRequest {
    let signature = sign(
        SignHash::Sha256,
        &SignInput {
            app_id: parts.app_id,
            secret: parts.app_key,
            text: parts.text,
            salt: parts.salt,
            curtime: Some(parts.curtime),
            truncate: true,
        },
    );

    PreparedRequest {
        url: parts.base_url.to_string(),
        headers: Vec::new(),
        body: form(&[
            ("q", parts.text),
            ("from", &parts.from.translation_code),
            ("to", &parts.to.translation_code),
            ("appKey", parts.app_id),
            ("salt", parts.salt),
            ("sign", &signature),
            ("signType", "v3"),
            ("curtime", parts.curtime),
        ]),
    }
}

#[derive(Deserialize)]
struct YoudaoResponse {
    #[serde(rename = "errorCode")]
    error_code: String,
    translation: Option<Vec<String>>,
}

fn parse_youdao(body: &str) -> Result<String, ResponseError> {
    let response: YoudaoResponse = serde_json::from_str(body).map_err(|e| malformed(&e))?;
    if response.error_code != "0" {
        return Err(ResponseError::Rejected(format!(
            "error code {}",
            response.error_code
        )));
    }
    response
        .translation
        .map(|lines| lines.join("\n"))
        .ok_or_else(|| ResponseError::Malformed("missing translation".to_string()))
}

fn build_microsoft(parts: &RequestParts<'_>) -> PreparedRequest {
    let url = UrlBuilder::new(parts.base_url)
        .param("api-version", "3.0")
        .param("from", &parts.from.translation_code)
        .param("to", &parts.to.translation_code)
        .build();

    let mut headers = vec![("Ocp-Apim-Subscription-Key", parts.app_key.to_string())];
    if !parts.app_id.is_empty() {
        headers.push(("Ocp-Apim-Subscription-Region", parts.app_id.to_string()));
    }

    PreparedRequest {
        url,
        headers,
        body: RequestBody::Json(json!([{ "Text": parts.text }])),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MicrosoftResponse {
    Success(Vec<MicrosoftItem>),
    Failure { error: MicrosoftError },
}

#[derive(Deserialize)]
struct MicrosoftItem {
    translations: Vec<TextItem>,
}

#[derive(Deserialize)]
struct MicrosoftError {
    code: Value,
    message: String,
}

#[derive(Deserialize)]
struct TextItem {
    text: String,
}

fn parse_microsoft(body: &str) -> Result<String, ResponseError> {
    let response: MicrosoftResponse = serde_json::from_str(body).map_err(|e| malformed(&e))?;
    match response {
        MicrosoftResponse::Success(items) => items
            .into_iter()
            .next()
            .and_then(|item| item.translations.into_iter().next())
            .map(|translation| translation.text)
            .ok_or_else(|| ResponseError::Malformed("empty translations".to_string())),
        MicrosoftResponse::Failure { error } => Err(ResponseError::Rejected(format!(
            "error {}: {}",
            error.code, error.message
        ))),
    }
}

fn build_deepl(parts: &RequestParts<'_>) -> PreparedRequest {
    let source = parts
        .from
        .translation_code
        .split('-')
        .next()
        .unwrap_or_default()
        .to_uppercase();
    let target = parts.to.translation_code.to_uppercase();

    let mut pairs = vec![("text", parts.text), ("target_lang", target.as_str())];
    if parts.from.code != "auto" {
        pairs.push(("source_lang", source.as_str()));
    }

    PreparedRequest {
        url: parts.base_url.to_string(),
        headers: vec![("Authorization", format!("DeepL-Auth-Key {}", parts.app_key))],
        body: form(&pairs),
    }
}

#[derive(Deserialize)]
struct DeeplResponse {
    translations: Option<Vec<TextItem>>,
    message: Option<String>,
}

fn parse_deepl(body: &str) -> Result<String, ResponseError> {
    let response: DeeplResponse = serde_json::from_str(body).map_err(|e| malformed(&e))?;
    if let Some(message) = response.message {
        return Err(ResponseError::Rejected(message));
    }
    response
        .translations
        .and_then(|items| items.into_iter().next())
        .map(|item| item.text)
        .ok_or_else(|| ResponseError::Malformed("missing translations".to_string()))
}

fn build_openai(parts: &RequestParts<'_>) -> PreparedRequest {
    let system_prompt = build_system_prompt(&parts.from.display_name, &parts.to.display_name);

    PreparedRequest {
        url: parts.base_url.to_string(),
        headers: vec![("Authorization", format!("Bearer {}", parts.app_key))],
        body: RequestBody::Json(json!({
            "model": parts.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": parts.text },
            ],
        })),
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatError {
    message: String,
}

fn parse_openai(body: &str) -> Result<String, ResponseError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| malformed(&e))?;
    if let Some(error) = response.error {
        return Err(ResponseError::Rejected(error.message));
    }
    response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ResponseError::Malformed("missing message content".to_string()))
}
