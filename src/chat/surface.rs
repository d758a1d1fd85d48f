//! Session state and the per-message capability operations.
//!
//! [`Surface`] owns the conversation and the capability loader. Capability
//! calls run on spawned tasks holding the handle captured when the request
//! was made; their results come back as [`SurfaceEvent`]s that the owner
//! feeds into [`Surface::apply`]. Nothing else mutates session state.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::capability::{
    Acquisition, Capability, CapabilityError, CapabilityLoader, CapabilityResult,
    DetectionCandidate, Host, LanguageDetector, LanguagePair, TranslationOutput, Translator,
    TranslatorHandle, normalize_translation, select_detection,
};
use crate::conversation::{ConversationStore, MessageId, MessagePatch};
use crate::language;

/// Messages at least this many characters long offer a summarize action.
pub const SUMMARIZE_THRESHOLD: usize = 150;

/// A finished capability call, waiting to be applied.
pub enum SurfaceEvent {
    DetectorAcquired {
        generation: u64,
        result: CapabilityResult<Arc<dyn LanguageDetector>>,
    },
    TranslatorAcquired {
        generation: u64,
        pair: LanguagePair,
        result: CapabilityResult<Arc<dyn Translator>>,
    },
    Detected {
        id: MessageId,
        result: CapabilityResult<Vec<DetectionCandidate>>,
    },
    Translated {
        id: MessageId,
        result: CapabilityResult<Option<TranslationOutput>>,
    },
}

/// What applying a [`SurfaceEvent`] changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    DetectorReady,
    TranslatorReady(LanguagePair),
    InitFailed {
        capability: Capability,
        reason: String,
    },
    /// A superseded acquisition finished and was dropped.
    Stale,
    Detected(MessageId),
    NoConfidentResult(MessageId),
    Translated(MessageId),
    OperationFailed {
        id: MessageId,
        capability: Capability,
        reason: String,
    },
}

/// Outcome of asking for a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Started,
    /// The target is the native language; no call was made.
    NotNeeded,
}

/// The interaction surface: conversation plus capabilities.
pub struct Surface {
    store: ConversationStore,
    loader: CapabilityLoader,
    tx: mpsc::UnboundedSender<SurfaceEvent>,
    rx: mpsc::UnboundedReceiver<SurfaceEvent>,
    pending: usize,
}

impl Surface {
    pub fn new(host: Arc<dyn Host>, native: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store: ConversationStore::new(target.clone()),
            loader: CapabilityLoader::new(host, native, target),
            tx,
            rx,
            pending: 0,
        }
    }

    /// Kicks off detector and translator acquisition.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        if let Some(acquisition) = self.loader.load_detector() {
            self.spawn_acquisition(acquisition);
        }
        if let Some(acquisition) = self.loader.load_translator() {
            self.spawn_acquisition(acquisition);
        }
    }

    pub const fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub const fn loader(&self) -> &CapabilityLoader {
        &self.loader
    }

    /// Number of capability calls still outstanding.
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Sends `text` as a new message. Blank text is ignored.
    pub fn send(&mut self, text: &str) -> Option<MessageId> {
        self.store.set_input(text);
        self.store.submit()
    }

    /// Starts language detection for a message.
    pub fn request_detection(&mut self, id: MessageId) -> CapabilityResult<()> {
        let content = self.content_of(id)?;
        let detector = self.loader.detector_handle().inspect_err(|e| {
            warn!(message_id = id.get(), error = %e, "detection rejected");
        })?;

        debug!(message_id = id.get(), "detecting language");
        self.spawn(async move {
            let result = detector.detect(&content).await;
            SurfaceEvent::Detected { id, result }
        });
        Ok(())
    }

    /// Starts translation of a message with the current translator.
    ///
    /// The handle is captured now; a target change while the call is in
    /// flight does not affect it.
    pub fn request_translation(&mut self, id: MessageId) -> CapabilityResult<Dispatch> {
        let content = self.content_of(id)?;
        let handle = self.loader.translator_handle().inspect_err(|e| {
            warn!(message_id = id.get(), error = %e, "translation rejected");
        })?;

        let translator = match handle {
            TranslatorHandle::Passthrough => {
                debug!(message_id = id.get(), "target is native language, nothing to do");
                return Ok(Dispatch::NotNeeded);
            }
            TranslatorHandle::Active(translator) => translator,
        };

        debug!(
            message_id = id.get(),
            pair = %self.loader.pair(),
            selected = self.store.get(id).map_or("", |m| m.selected_lang()),
            "translating"
        );
        self.spawn(async move {
            let result = translator.translate(&content).await;
            SurfaceEvent::Translated { id, result }
        });
        Ok(Dispatch::Started)
    }

    /// Points a message (and new messages) at another target language.
    ///
    /// Also restarts translator acquisition for the new target.
    pub fn change_message_language(&mut self, id: MessageId, lang: &str) -> CapabilityResult<()> {
        if !language::is_selectable(lang) {
            return Err(CapabilityError::UnsupportedLanguage(lang.to_string()));
        }
        if self.store.get(id).is_none() {
            return Err(CapabilityError::UnknownMessage(id));
        }

        self.store.update_message(id, MessagePatch::selected_lang(lang));
        self.store.set_default_language(lang);
        if let Some(acquisition) = self.loader.select_target(lang) {
            self.spawn_acquisition(acquisition);
        }
        Ok(())
    }

    /// Whether the message is long enough to offer summarizing.
    pub fn can_summarize(&self, id: MessageId) -> bool {
        self.store
            .get(id)
            .is_some_and(|m| m.content().chars().count() >= SUMMARIZE_THRESHOLD)
    }

    /// Waits for the next finished capability call.
    pub async fn next_event(&mut self) -> Option<SurfaceEvent> {
        self.rx.recv().await
    }

    /// Returns a finished capability call if one is already waiting.
    pub fn try_next_event(&mut self) -> Option<SurfaceEvent> {
        self.rx.try_recv().ok()
    }

    /// Applies a finished capability call to the session.
    pub fn apply(&mut self, event: SurfaceEvent) -> Notice {
        self.pending = self.pending.saturating_sub(1);

        match event {
            SurfaceEvent::DetectorAcquired { generation, result } => {
                let failure = result.as_ref().err().map(ToString::to_string);
                if !self.loader.complete_detector(generation, result) {
                    return Notice::Stale;
                }
                failure.map_or(Notice::DetectorReady, |reason| Notice::InitFailed {
                    capability: Capability::Detector,
                    reason,
                })
            }
            SurfaceEvent::TranslatorAcquired {
                generation,
                pair,
                result,
            } => {
                let failure = result.as_ref().err().map(ToString::to_string);
                if !self.loader.complete_translator(generation, result) {
                    return Notice::Stale;
                }
                failure.map_or(Notice::TranslatorReady(pair), |reason| Notice::InitFailed {
                    capability: Capability::Translator,
                    reason,
                })
            }
            SurfaceEvent::Detected { id, result } => self.apply_detection(id, result),
            SurfaceEvent::Translated { id, result } => self.apply_translation(id, result),
        }
    }

    /// Drives every outstanding call to completion, returning what changed.
    ///
    /// Never returns if a capability call never resolves.
    pub async fn settle(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while self.pending > 0 {
            let Some(event) = self.next_event().await else {
                break;
            };
            notices.push(self.apply(event));
        }
        notices
    }

    fn apply_detection(
        &mut self,
        id: MessageId,
        result: CapabilityResult<Vec<DetectionCandidate>>,
    ) -> Notice {
        let candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                info!(message_id = id.get(), error = %e, "language detection failed");
                return Notice::OperationFailed {
                    id,
                    capability: Capability::Detector,
                    reason: e.to_string(),
                };
            }
        };

        debug!(message_id = id.get(), candidates = candidates.len(), "detection finished");
        let Some(detected) = select_detection(&candidates) else {
            info!(message_id = id.get(), "{}", CapabilityError::NoConfidentResult);
            return Notice::NoConfidentResult(id);
        };

        info!(
            message_id = id.get(),
            language = %detected.language,
            confidence = detected.confidence,
            "language detected"
        );
        self.store.update_message(id, MessagePatch::detected(detected));
        Notice::Detected(id)
    }

    fn apply_translation(
        &mut self,
        id: MessageId,
        result: CapabilityResult<Option<TranslationOutput>>,
    ) -> Notice {
        match result {
            Ok(output) => {
                let text = normalize_translation(output);
                info!(message_id = id.get(), "translation finished");
                self.store.update_message(id, MessagePatch::translated(text));
                Notice::Translated(id)
            }
            Err(e) => {
                info!(message_id = id.get(), error = %e, "translation failed");
                Notice::OperationFailed {
                    id,
                    capability: Capability::Translator,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn content_of(&self, id: MessageId) -> CapabilityResult<String> {
        self.store
            .get(id)
            .map(|m| m.content().to_string())
            .ok_or(CapabilityError::UnknownMessage(id))
    }

    fn spawn_acquisition(&mut self, acquisition: Acquisition) {
        match acquisition {
            Acquisition::Detector { generation, task } => self.spawn(async move {
                SurfaceEvent::DetectorAcquired {
                    generation,
                    result: task.await,
                }
            }),
            Acquisition::Translator {
                generation,
                pair,
                task,
            } => self.spawn(async move {
                SurfaceEvent::TranslatorAcquired {
                    generation,
                    pair,
                    result: task.await,
                }
            }),
        }
    }

    fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = SurfaceEvent> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the surface; a send error means
            // the session is gone and the result has nowhere to go.
            let _ = tx.send(work.await);
        });
    }
}
