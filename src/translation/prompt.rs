pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator for mobile app user interface strings. \
     Translate the user's text from {source_language} to {target_language}. \
     Output only the translated text without any explanations or quotes. \
     Keep format specifiers such as %s, %1$d and {name} exactly as they appear, \
     and preserve leading and trailing whitespace.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(source_language: &str, target_language: &str) -> String {
    // {source_language} and {target_language} are replaced literally, not format arguments
    SYSTEM_PROMPT_TEMPLATE
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
}
