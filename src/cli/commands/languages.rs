use anyhow::{Result, bail};

use crate::translation::{all_languages, find_provider, print_languages, provider_keys};

/// Prints the language catalog, optionally limited to one provider's languages.
pub fn print_supported_languages(provider: Option<&str>) -> Result<()> {
    let languages = match provider {
        Some(key) => {
            let Some(definition) = find_provider(key) else {
                bail!(
                    "Provider '{key}' not found\n\n\
                     Available providers: {}",
                    provider_keys().join(", ")
                );
            };
            all_languages()
                .into_iter()
                .filter(|lang| definition.supports(lang))
                .collect()
        }
        None => all_languages(),
    };

    print_languages(&languages);
    Ok(())
}
