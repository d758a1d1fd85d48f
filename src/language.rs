//! Language codes the chat surface can translate into.

use anyhow::Result;

use crate::ui::Style;

/// The language messages are written in when no translation is needed.
pub const NATIVE_LANGUAGE: &str = "en";

/// Selectable target language codes (ISO 639-1) and their names.
pub const TARGET_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("pt", "Portuguese"),
    ("es", "Spanish"),
    ("ru", "Russian"),
    ("tr", "Turkish"),
    ("fr", "French"),
];

/// Prints all selectable language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Target language codes (ISO 639-1)"));
    for (code, name) in TARGET_LANGUAGES {
        let marker = if *code == NATIVE_LANGUAGE {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        println!("  {:5} {}{marker}", Style::code(code), Style::secondary(name));
    }
}

/// Returns `true` if `lang` can be picked as a translation target.
pub fn is_selectable(lang: &str) -> bool {
    TARGET_LANGUAGES.iter().any(|(code, _)| *code == lang)
}

/// Human-readable name for a language code, if it is one we know.
pub fn language_name(code: &str) -> Option<&'static str> {
    TARGET_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Validates that the given language code is selectable.
///
/// # Errors
///
/// Returns an error if the language code is not in the target list.
pub fn validate_language(lang: &str) -> Result<()> {
    if is_selectable(lang) {
        Ok(())
    } else {
        let codes: Vec<&str> = TARGET_LANGUAGES.iter().map(|(code, _)| *code).collect();
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid language codes: {}\n\
             Run 'lingo languages' to see their names.",
            codes.join(", ")
        )
    }
}
