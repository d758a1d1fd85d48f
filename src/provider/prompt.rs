use crate::capability::LanguagePair;
use crate::language::language_name;

pub const TRANSLATION_PROMPT_TEMPLATE: &str = "You are a translator. Translate the following text from {source_language} to {target_language}. \
     Output only the translated text without any explanations. \
     Preserve the original formatting including blank lines and whitespace.";

pub const DETECTION_PROMPT: &str = "You identify the language of text. \
     Reply with a JSON array of up to three candidates, most likely first, each shaped like \
     {\"detectedLanguage\": \"<ISO 639-1 code>\", \"confidence\": <number between 0 and 1>}. \
     Output only the JSON array.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_translation_prompt(pair: &LanguagePair) -> String {
    // {source_language} and {target_language} are placeholders, not format arguments
    TRANSLATION_PROMPT_TEMPLATE
        .replace("{source_language}", describe(&pair.source))
        .replace("{target_language}", describe(&pair.target))
}

fn describe(code: &str) -> &str {
    language_name(code).unwrap_or(code)
}
