use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::ChatClient;
use super::prompt::{DETECTION_PROMPT, build_translation_prompt};
use crate::capability::{
    Capability, CapabilityError, CapabilityResult, DetectionCandidate, DetectorFactory,
    LanguageDetector, LanguagePair, TranslationOutput, Translator, TranslatorFactory,
};

/// Acquires model-backed handles after checking the model is served.
pub(super) struct ModelFactory {
    client: Arc<ChatClient>,
}

impl ModelFactory {
    pub(super) const fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }
}

impl DetectorFactory for ModelFactory {
    fn create(&self) -> BoxFuture<'_, CapabilityResult<Arc<dyn LanguageDetector>>> {
        Box::pin(async move {
            self.client
                .ensure_model()
                .await
                .map_err(|e| CapabilityError::init_failed(Capability::Detector, format!("{e:#}")))?;

            let detector: Arc<dyn LanguageDetector> = Arc::new(ModelDetector {
                client: self.client.clone(),
            });
            Ok(detector)
        })
    }
}

impl TranslatorFactory for ModelFactory {
    fn create(&self, pair: LanguagePair) -> BoxFuture<'_, CapabilityResult<Arc<dyn Translator>>> {
        Box::pin(async move {
            self.client.ensure_model().await.map_err(|e| {
                CapabilityError::init_failed(Capability::Translator, format!("{e:#}"))
            })?;

            let translator: Arc<dyn Translator> = Arc::new(ModelTranslator {
                client: self.client.clone(),
                system_prompt: build_translation_prompt(&pair),
                pair,
            });
            Ok(translator)
        })
    }
}

/// Detects languages by asking the model for ranked JSON candidates.
pub struct ModelDetector {
    client: Arc<ChatClient>,
}

impl LanguageDetector for ModelDetector {
    fn detect<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Vec<DetectionCandidate>>> {
        Box::pin(async move {
            let reply = self
                .client
                .complete(DETECTION_PROMPT, text)
                .await
                .map_err(|e| {
                    CapabilityError::operation_failed(Capability::Detector, format!("{e:#}"))
                })?;
            debug!(reply = %reply.trim(), "detector reply");
            parse_candidates(&reply)
        })
    }
}

/// Translates between one fixed language pair.
pub struct ModelTranslator {
    client: Arc<ChatClient>,
    pair: LanguagePair,
    system_prompt: String,
}

impl Translator for ModelTranslator {
    fn translate<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Option<TranslationOutput>>> {
        Box::pin(async move {
            let reply = self
                .client
                .complete(&self.system_prompt, text)
                .await
                .map_err(|e| {
                    CapabilityError::operation_failed(Capability::Translator, format!("{e:#}"))
                })?;
            debug!(pair = %self.pair, chars = reply.len(), "translator reply");
            Ok(Some(TranslationOutput::Text(reply)))
        })
    }
}

/// Extracts detection candidates from a model reply.
///
/// Models like to wrap JSON in prose or code fences, so the first array
/// (or failing that, a lone object) that parses is taken and anything
/// around it is ignored.
pub fn parse_candidates(reply: &str) -> CapabilityResult<Vec<DetectionCandidate>> {
    if let Some(candidates) = first_value::<Vec<DetectionCandidate>>(reply, '[') {
        return Ok(candidates);
    }
    if let Some(candidate) = first_value::<DetectionCandidate>(reply, '{') {
        return Ok(vec![candidate]);
    }
    Err(CapabilityError::operation_failed(
        Capability::Detector,
        format!("unparsable detector reply: {}", reply.trim()),
    ))
}

/// Parses the first JSON value starting at an `open` character, ignoring
/// whatever text follows it.
fn first_value<T: DeserializeOwned>(text: &str, open: char) -> Option<T> {
    text.match_indices(open).find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<T>()
            .next()?
            .ok()
    })
}
