#![allow(clippy::unwrap_used)]
//! End-to-end conversation flow against an in-memory capability host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use lingo_cli::capability::{
    Availability, CapabilityResult, CapabilityState, DetectionCandidate, DetectorFactory, Host,
    LanguageDetector, LanguagePair, TranslationOutput, Translator, TranslatorFactory,
};
use lingo_cli::chat::{Dispatch, Notice, Surface};

/// Detects French and answers every translation with a structured reply.
#[derive(Clone, Default)]
struct FakeHost {
    pairs: Arc<Mutex<Vec<LanguagePair>>>,
    calls: Arc<AtomicUsize>,
}

impl Host for FakeHost {
    fn detector(&self) -> Availability<Arc<dyn DetectorFactory>> {
        Availability::Available(Arc::new(self.clone()))
    }

    fn translator(&self) -> Availability<Arc<dyn TranslatorFactory>> {
        Availability::Available(Arc::new(self.clone()))
    }
}

impl DetectorFactory for FakeHost {
    fn create(&self) -> BoxFuture<'_, CapabilityResult<Arc<dyn LanguageDetector>>> {
        Box::pin(async move {
            let detector: Arc<dyn LanguageDetector> = Arc::new(FrenchDetector);
            Ok(detector)
        })
    }
}

impl TranslatorFactory for FakeHost {
    fn create(&self, pair: LanguagePair) -> BoxFuture<'_, CapabilityResult<Arc<dyn Translator>>> {
        Box::pin(async move {
            self.pairs.lock().unwrap().push(pair);
            let translator: Arc<dyn Translator> = Arc::new(FixedTranslator(self.calls.clone()));
            Ok(translator)
        })
    }
}

struct FrenchDetector;

impl LanguageDetector for FrenchDetector {
    fn detect<'a>(
        &'a self,
        _text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Vec<DetectionCandidate>>> {
        Box::pin(async move {
            Ok(vec![
                DetectionCandidate::new("", 0.95),
                DetectionCandidate::new("fr", 0.9),
                DetectionCandidate::new("de", 0.01),
            ])
        })
    }
}

struct FixedTranslator(Arc<AtomicUsize>);

impl Translator for FixedTranslator {
    fn translate<'a>(
        &'a self,
        _text: &'a str,
    ) -> BoxFuture<'a, CapabilityResult<Option<TranslationOutput>>> {
        Box::pin(async move {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TranslationOutput::Structured {
                translated_text: Some("Hello world".to_string()),
            }))
        })
    }
}

#[tokio::test]
async fn test_send_detect_select_and_translate() {
    let host = FakeHost::default();
    let mut surface = Surface::new(Arc::new(host.clone()), "en", "en");
    surface.mount();
    surface.settle().await;

    assert!(surface.loader().detector().is_ready());
    assert!(matches!(
        surface.loader().translator(),
        CapabilityState::Ready(handle) if handle.is_passthrough()
    ));

    let id = surface.send("Bonjour le monde").unwrap();
    assert_eq!(surface.store().len(), 1);
    let message = surface.store().get(id).unwrap();
    assert_eq!(message.content(), "Bonjour le monde");
    assert!(message.translated().is_none());
    assert!(message.detected_lang().is_none());

    surface.request_detection(id).unwrap();
    assert_eq!(surface.settle().await, vec![Notice::Detected(id)]);
    let detected = surface.store().get(id).unwrap().detected_lang().unwrap();
    assert_eq!(detected.language, "fr");
    assert!((detected.confidence - 0.9).abs() < f64::EPSILON);

    surface.change_message_language(id, "es").unwrap();
    assert_eq!(
        surface.settle().await,
        vec![Notice::TranslatorReady(LanguagePair::new("en", "es"))]
    );
    assert_eq!(
        *host.pairs.lock().unwrap(),
        vec![LanguagePair::new("en", "es")]
    );
    assert_eq!(surface.store().get(id).unwrap().selected_lang(), "es");

    assert_eq!(surface.request_translation(id).unwrap(), Dispatch::Started);
    assert_eq!(surface.settle().await, vec![Notice::Translated(id)]);

    let message = surface.store().get(id).unwrap();
    assert_eq!(message.translated(), Some("Hello world"));
    assert_eq!(message.content(), "Bonjour le monde");
    assert_eq!(host.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_native_target_makes_no_translation_call() {
    let host = FakeHost::default();
    let mut surface = Surface::new(Arc::new(host.clone()), "en", "en");
    surface.mount();
    surface.settle().await;

    let id = surface.send("Hello there").unwrap();
    assert_eq!(surface.request_translation(id).unwrap(), Dispatch::NotNeeded);

    assert_eq!(surface.pending(), 0);
    assert_eq!(host.calls.load(Ordering::SeqCst), 0);
    assert!(host.pairs.lock().unwrap().is_empty());
    assert!(surface.store().get(id).unwrap().translated().is_none());
}

#[tokio::test]
async fn test_blank_input_is_not_appended() {
    let mut surface = Surface::new(Arc::new(FakeHost::default()), "en", "es");

    assert!(surface.send("   \n").is_none());
    assert!(surface.store().is_empty());
}
