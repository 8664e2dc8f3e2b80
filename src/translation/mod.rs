mod error;
mod language;
mod prompt;
mod provider;
mod registry;
mod signing;
mod token;
mod url_builder;

pub use error::{TranslationError, TranslationErrorKind};
pub use language::{CATALOG, Lang, all_languages, find_language, print_languages, validate_language};
pub use provider::{Provider, ProviderConfig, Translator};
pub use registry::{
    DEFAULT_PROVIDER, PROVIDERS, PreparedRequest, ProviderDefinition, RequestBody, RequestParts,
    ResponseError, find_provider, provider_keys,
};
pub use signing::{SignHash, SignInput, sign, truncate_input};
pub use token::{
    RemoteSeedSource, SEED_SCRIPT_URL, Seed, SeedSource, StaticSeedSource, TokenKeeper,
    compute_token, parse_seed,
};
pub use url_builder::UrlBuilder;
