//! In-memory host for exercising the loader and the chat surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use tokio::sync::Notify;

use super::{
    Availability, Capability, CapabilityError, CapabilityResult, DetectionCandidate,
    DetectorFactory, Host, LanguageDetector, LanguagePair, TranslationOutput, Translator,
    TranslatorFactory,
};

/// A host whose capabilities answer from a script.
///
/// With `translation` left as `None` the translator echoes its input tagged
/// with the target it was created for, e.g. `"hola (es)"`.
#[derive(Clone)]
pub struct ScriptedHost {
    pub detector_available: bool,
    pub translator_available: bool,
    pub fail_create: bool,
    pub detections: CapabilityResult<Vec<DetectionCandidate>>,
    pub translation: Option<CapabilityResult<Option<TranslationOutput>>>,
    pub created_pairs: Arc<Mutex<Vec<LanguagePair>>>,
    pub translate_calls: Arc<AtomicUsize>,
    /// Translator creation for a target waits until its gate is notified.
    pub gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self {
            detector_available: true,
            translator_available: true,
            fail_create: false,
            detections: Ok(vec![DetectionCandidate::new("fr", 0.9)]),
            translation: None,
            created_pairs: Arc::default(),
            translate_calls: Arc::default(),
            gates: Arc::default(),
        }
    }
}

impl ScriptedHost {
    /// Holds back translator creation for `target` until the returned gate fires.
    #[allow(clippy::unwrap_used)]
    pub fn gate(&self, target: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(target.to_string(), gate.clone());
        gate
    }

    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }
}

impl Host for ScriptedHost {
    fn detector(&self) -> Availability<Arc<dyn DetectorFactory>> {
        if self.detector_available {
            Availability::Available(Arc::new(ScriptedFactory(self.clone())))
        } else {
            Availability::Unavailable
        }
    }

    fn translator(&self) -> Availability<Arc<dyn TranslatorFactory>> {
        if self.translator_available {
            Availability::Available(Arc::new(ScriptedFactory(self.clone())))
        } else {
            Availability::Unavailable
        }
    }
}

struct ScriptedFactory(ScriptedHost);

impl DetectorFactory for ScriptedFactory {
    fn create(&self) -> BoxFuture<'_, CapabilityResult<Arc<dyn LanguageDetector>>> {
        Box::pin(async move {
            if self.0.fail_create {
                return Err(CapabilityError::init_failed(Capability::Detector, "scripted"));
            }
            let detector: Arc<dyn LanguageDetector> =
                Arc::new(ScriptedDetector(self.0.detections.clone()));
            Ok(detector)
        })
    }
}

impl TranslatorFactory for ScriptedFactory {
    #[allow(clippy::unwrap_used)]
    fn create(&self, pair: LanguagePair) -> BoxFuture<'_, CapabilityResult<Arc<dyn Translator>>> {
        Box::pin(async move {
            self.0.created_pairs.lock().unwrap().push(pair.clone());

            let gate = self.0.gates.lock().unwrap().get(&pair.target).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            if self.0.fail_create {
                return Err(CapabilityError::init_failed(Capability::Translator, "scripted"));
            }
            let translator: Arc<dyn Translator> = Arc::new(ScriptedTranslator {
                pair,
                translation: self.0.translation.clone(),
                calls: self.0.translate_calls.clone(),
            });
            Ok(translator)
        })
    }
}

struct ScriptedDetector(CapabilityResult<Vec<DetectionCandidate>>);

impl LanguageDetector for ScriptedDetector {
    fn detect<'a>(
        &'a self,
        _text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Vec<DetectionCandidate>>> {
        Box::pin(async move { self.0.clone() })
    }
}

struct ScriptedTranslator {
    pair: LanguagePair,
    translation: Option<CapabilityResult<Option<TranslationOutput>>>,
    calls: Arc<AtomicUsize>,
}

impl Translator for ScriptedTranslator {
    fn translate<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Option<TranslationOutput>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.translation.clone().unwrap_or_else(|| {
                Ok(Some(TranslationOutput::Text(format!(
                    "{text} ({})",
                    self.pair.target
                ))))
            })
        })
    }
}
