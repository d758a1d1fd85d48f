//! Capability contracts for language detection and translation.
//!
//! A [`Host`] is probed for each capability and answers with an
//! [`Availability`]. Available capabilities hand out a factory which is then
//! used to acquire a handle; handles do the actual detect/translate calls.
//! Everything behind these traits is a black box to the chat surface.

mod error;
mod loader;
mod outcome;
mod state;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Deserialize;

pub use error::{Capability, CapabilityError, CapabilityResult};
pub use loader::{Acquisition, CapabilityLoader};
pub use outcome::{MIN_CONFIDENCE, TRANSLATION_FAILED, normalize_translation, select_detection};
pub use state::{CapabilityState, TranslatorHandle};

/// One language guess returned by a detector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionCandidate {
    #[serde(rename = "detectedLanguage", default)]
    pub detected_language: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl DetectionCandidate {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            detected_language: Some(language.into()),
            confidence: Some(confidence),
        }
    }
}

/// Raw translator output: either plain text or an object carrying it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TranslationOutput {
    Text(String),
    Structured {
        #[serde(rename = "translatedText", default)]
        translated_text: Option<String>,
    },
}

/// Source and target language a translator is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}→{}", self.source, self.target)
    }
}

/// An acquired language detector.
pub trait LanguageDetector: Send + Sync {
    fn detect<'a>(&'a self, text: &'a str)
    -> BoxFuture<'a, CapabilityResult<Vec<DetectionCandidate>>>;
}

/// An acquired translator, bound to one [`LanguagePair`].
pub trait Translator: Send + Sync {
    /// `Ok(None)` means the call succeeded but produced nothing usable.
    fn translate<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Option<TranslationOutput>>>;
}

pub trait DetectorFactory: Send + Sync {
    fn create(&self) -> BoxFuture<'_, CapabilityResult<Arc<dyn LanguageDetector>>>;
}

pub trait TranslatorFactory: Send + Sync {
    fn create(&self, pair: LanguagePair) -> BoxFuture<'_, CapabilityResult<Arc<dyn Translator>>>;
}

/// Result of probing a host for one capability.
pub enum Availability<F> {
    Available(F),
    Unavailable,
}

/// The environment capabilities are probed from.
///
/// Probing never fails; a missing capability is reported as
/// [`Availability::Unavailable`].
pub trait Host: Send + Sync {
    fn detector(&self) -> Availability<Arc<dyn DetectorFactory>>;
    fn translator(&self) -> Availability<Arc<dyn TranslatorFactory>>;
}

/// A host that exposes nothing, used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl Host for NoCapabilities {
    fn detector(&self) -> Availability<Arc<dyn DetectorFactory>> {
        Availability::Unavailable
    }

    fn translator(&self) -> Availability<Arc<dyn TranslatorFactory>> {
        Availability::Unavailable
    }
}

#[cfg(test)]
pub(crate) mod testing;
