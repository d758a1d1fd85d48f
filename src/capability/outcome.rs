use crate::conversation::DetectedLanguage;

use super::{DetectionCandidate, TranslationOutput};

/// Candidates below this confidence are ignored.
pub const MIN_CONFIDENCE: f64 = 0.05;

/// Stored as the translation when the translator returned nothing usable.
pub const TRANSLATION_FAILED: &str = "Translation failed";

/// Picks the detection to record for a message.
///
/// Candidates without a language code or below [`MIN_CONFIDENCE`] are
/// dropped; the first survivor wins in the order the detector returned them.
pub fn select_detection(candidates: &[DetectionCandidate]) -> Option<DetectedLanguage> {
    candidates.iter().find_map(|candidate| {
        let language = candidate
            .detected_language
            .as_deref()
            .filter(|code| !code.trim().is_empty())?;
        let confidence = candidate.confidence.filter(|c| *c >= MIN_CONFIDENCE)?;
        Some(DetectedLanguage {
            language: language.to_string(),
            confidence: confidence.min(1.0),
        })
    })
}

/// Collapses the translator's output shapes into the text to store.
pub fn normalize_translation(output: Option<TranslationOutput>) -> String {
    let text = match output {
        Some(TranslationOutput::Text(text)) => Some(text),
        Some(TranslationOutput::Structured { translated_text }) => translated_text,
        None => None,
    };

    text.filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| TRANSLATION_FAILED.to_string())
}
