//! Language catalog and code validation.

use anyhow::Result;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ui::Style;

/// A language known to the tool.
///
/// `code` is the Android resource qualifier (`values-{code}`); `translation_code`
/// is what gets sent to providers. Providers with nonstandard codes get a new
/// value through [`Lang::with_translation_code`]. Equality is by `id`.
#[derive(Debug, Clone)]
pub struct Lang {
    pub id: u32,
    pub code: String,
    pub translation_code: String,
    pub display_name: String,
}

impl Lang {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.0,
            code: entry.1.to_string(),
            translation_code: entry.2.to_string(),
            display_name: entry.3.to_string(),
        }
    }

    /// Returns a copy of this language using `code` when talking to a provider.
    #[must_use]
    pub fn with_translation_code(&self, code: &str) -> Self {
        Self {
            translation_code: code.to_string(),
            ..self.clone()
        }
    }

    /// Name of the resource directory holding this language's values.
    pub fn values_dir_name(&self) -> String {
        format!("values-{}", self.code)
    }
}

impl PartialEq for Lang {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Lang {}

impl Hash for Lang {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.code)
    }
}

type CatalogEntry = (u32, &'static str, &'static str, &'static str);

/// Supported languages: id, resource code, translation code, display name.
pub const CATALOG: &[CatalogEntry] = &[
    (0, "auto", "auto", "Auto detect"),
    (1, "af", "af", "Afrikaans"),
    (2, "am", "am", "Amharic"),
    (3, "ar", "ar", "Arabic"),
    (4, "az", "az", "Azerbaijani"),
    (5, "be", "be", "Belarusian"),
    (6, "bg", "bg", "Bulgarian"),
    (7, "bn", "bn", "Bengali"),
    (8, "bs", "bs", "Bosnian"),
    (9, "ca", "ca", "Catalan"),
    (10, "cs", "cs", "Czech"),
    (11, "cy", "cy", "Welsh"),
    (12, "da", "da", "Danish"),
    (13, "de", "de", "German"),
    (14, "el", "el", "Greek"),
    (15, "en", "en", "English"),
    (16, "es", "es", "Spanish"),
    (17, "et", "et", "Estonian"),
    (18, "eu", "eu", "Basque"),
    (19, "fa", "fa", "Persian"),
    (20, "fi", "fi", "Finnish"),
    (21, "fil", "tl", "Filipino"),
    (22, "fr", "fr", "French"),
    (23, "ga", "ga", "Irish"),
    (24, "gl", "gl", "Galician"),
    (25, "gu", "gu", "Gujarati"),
    (26, "iw", "iw", "Hebrew"),
    (27, "hi", "hi", "Hindi"),
    (28, "hr", "hr", "Croatian"),
    (29, "hu", "hu", "Hungarian"),
    (30, "hy", "hy", "Armenian"),
    (31, "in", "id", "Indonesian"),
    (32, "is", "is", "Icelandic"),
    (33, "it", "it", "Italian"),
    (34, "ja", "ja", "Japanese"),
    (35, "ka", "ka", "Georgian"),
    (36, "kk", "kk", "Kazakh"),
    (37, "km", "km", "Khmer"),
    (38, "kn", "kn", "Kannada"),
    (39, "ko", "ko", "Korean"),
    (40, "lo", "lo", "Lao"),
    (41, "lt", "lt", "Lithuanian"),
    (42, "lv", "lv", "Latvian"),
    (43, "mk", "mk", "Macedonian"),
    (44, "ml", "ml", "Malayalam"),
    (45, "mn", "mn", "Mongolian"),
    (46, "mr", "mr", "Marathi"),
    (47, "ms", "ms", "Malay"),
    (48, "my", "my", "Myanmar (Burmese)"),
    (49, "ne", "ne", "Nepali"),
    (50, "nl", "nl", "Dutch"),
    (51, "nb", "no", "Norwegian"),
    (52, "pa", "pa", "Punjabi"),
    (53, "pl", "pl", "Polish"),
    (54, "pt", "pt", "Portuguese"),
    (55, "pt-rBR", "pt-BR", "Portuguese (Brazil)"),
    (56, "ro", "ro", "Romanian"),
    (57, "ru", "ru", "Russian"),
    (58, "si", "si", "Sinhala"),
    (59, "sk", "sk", "Slovak"),
    (60, "sl", "sl", "Slovenian"),
    (61, "sq", "sq", "Albanian"),
    (62, "sr", "sr", "Serbian"),
    (63, "sv", "sv", "Swedish"),
    (64, "sw", "sw", "Swahili"),
    (65, "ta", "ta", "Tamil"),
    (66, "te", "te", "Telugu"),
    (67, "th", "th", "Thai"),
    (68, "tr", "tr", "Turkish"),
    (69, "uk", "uk", "Ukrainian"),
    (70, "ur", "ur", "Urdu"),
    (71, "uz", "uz", "Uzbek"),
    (72, "vi", "vi", "Vietnamese"),
    (73, "zh-rCN", "zh-CN", "Chinese (Simplified)"),
    (74, "zh-rTW", "zh-TW", "Chinese (Traditional)"),
    (75, "zh-rHK", "zh-TW", "Chinese (Hong Kong)"),
    (76, "zu", "zu", "Zulu"),
];

/// Every language in the catalog except `auto`.
pub fn all_languages() -> Vec<Lang> {
    CATALOG
        .iter()
        .filter(|entry| entry.1 != "auto")
        .map(Lang::from_entry)
        .collect()
}

/// Looks up a language by its resource code (`fr`, `zh-rCN`, `auto`, ...).
pub fn find_language(code: &str) -> Option<Lang> {
    CATALOG
        .iter()
        .find(|entry| entry.1 == code)
        .map(Lang::from_entry)
}

/// Prints the languages to stdout.
pub fn print_languages(languages: &[Lang]) {
    println!("{}", Style::header("Supported language codes"));
    for lang in languages {
        println!(
            "  {:8} {}",
            Style::code(&lang.code),
            Style::secondary(&lang.display_name)
        );
    }
}

/// Resolves a language code, failing with a hint when it is unknown.
///
/// # Errors
///
/// Returns an error if the code is not in the catalog.
pub fn validate_language(code: &str) -> Result<Lang> {
    find_language(code).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid language code: '{code}'\n\n\
             Codes are Android resource qualifiers: fr, de, ja, zh-rCN, pt-rBR, ...\n\
             Run 'strsync languages' to see all supported codes."
        )
    })
}
