use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use super::{
    Availability, Capability, CapabilityError, CapabilityResult, CapabilityState, Host,
    LanguageDetector, LanguagePair, Translator, TranslatorHandle,
};

/// A pending handle acquisition, returned to the owner to run.
///
/// The loader never spawns anything itself; the owner drives the future and
/// reports the outcome back with the matching `complete_*` call, passing the
/// generation along unchanged.
pub enum Acquisition {
    Detector {
        generation: u64,
        task: BoxFuture<'static, CapabilityResult<Arc<dyn LanguageDetector>>>,
    },
    Translator {
        generation: u64,
        pair: LanguagePair,
        task: BoxFuture<'static, CapabilityResult<Arc<dyn Translator>>>,
    },
}

/// Tracks the detector and translator lifecycles for one session.
pub struct CapabilityLoader {
    host: Arc<dyn Host>,
    native: String,
    target: String,
    detector: CapabilityState<Arc<dyn LanguageDetector>>,
    translator: CapabilityState<TranslatorHandle>,
    detector_generation: u64,
    translator_generation: u64,
}

impl CapabilityLoader {
    pub fn new(host: Arc<dyn Host>, native: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            host,
            native: native.into(),
            target: target.into(),
            detector: CapabilityState::Uninitialized,
            translator: CapabilityState::Uninitialized,
            detector_generation: 0,
            translator_generation: 0,
        }
    }

    /// Starts (or restarts) detector acquisition.
    ///
    /// Returns `None` when the host has no detector; the state is then
    /// `Unavailable` and stays that way until called again.
    pub fn load_detector(&mut self) -> Option<Acquisition> {
        self.detector_generation += 1;
        let generation = self.detector_generation;

        match self.host.detector() {
            Availability::Unavailable => {
                warn!(capability = %Capability::Detector, "not available on this host");
                self.detector = CapabilityState::Unavailable;
                None
            }
            Availability::Available(factory) => {
                debug!(capability = %Capability::Detector, generation, "initializing");
                self.detector = CapabilityState::Initializing;
                Some(Acquisition::Detector {
                    generation,
                    task: Box::pin(async move { factory.create().await }),
                })
            }
        }
    }

    /// Switches the translation target and restarts translator acquisition.
    ///
    /// The previous handle is dropped immediately. Selecting the native
    /// language needs no acquisition and leaves the translator ready as a
    /// passthrough. Re-selecting the current target is a no-op unless the
    /// last acquisition failed or none has run yet.
    pub fn select_target(&mut self, target: impl Into<String>) -> Option<Acquisition> {
        let target = target.into();
        if target == self.target
            && matches!(
                self.translator,
                CapabilityState::Ready(_)
                    | CapabilityState::Initializing
                    | CapabilityState::Unavailable
            )
        {
            debug!(target_lang = %target, "target unchanged, keeping translator");
            return None;
        }

        self.target = target;
        self.translator_generation += 1;
        let generation = self.translator_generation;

        let factory = match self.host.translator() {
            Availability::Unavailable => {
                warn!(capability = %Capability::Translator, "not available on this host");
                self.translator = CapabilityState::Unavailable;
                return None;
            }
            Availability::Available(factory) => factory,
        };

        if self.target == self.native {
            debug!(target_lang = %self.target, "native language selected, no translator needed");
            self.translator = CapabilityState::Ready(TranslatorHandle::Passthrough);
            return None;
        }

        let pair = self.pair();
        info!(capability = %Capability::Translator, %pair, generation, "initializing");
        self.translator = CapabilityState::Initializing;
        Some(Acquisition::Translator {
            generation,
            pair: pair.clone(),
            task: Box::pin(async move { factory.create(pair).await }),
        })
    }

    /// Acquires a translator for the current target.
    pub fn load_translator(&mut self) -> Option<Acquisition> {
        self.select_target(self.target.clone())
    }

    /// Records the outcome of a detector acquisition.
    ///
    /// Returns `false` if the acquisition was superseded and got discarded.
    pub fn complete_detector(
        &mut self,
        generation: u64,
        result: CapabilityResult<Arc<dyn LanguageDetector>>,
    ) -> bool {
        if generation != self.detector_generation {
            debug!(generation, current = self.detector_generation, "discarding stale detector");
            return false;
        }

        self.detector = match result {
            Ok(handle) => {
                info!(capability = %Capability::Detector, "ready");
                CapabilityState::Ready(handle)
            }
            Err(e) => {
                info!(capability = %Capability::Detector, error = %e, "initialization failed");
                CapabilityState::Failed(e.to_string())
            }
        };
        true
    }

    /// Records the outcome of a translator acquisition.
    ///
    /// Returns `false` if the target changed since it started; the result is
    /// then dropped and the newer acquisition wins.
    pub fn complete_translator(
        &mut self,
        generation: u64,
        result: CapabilityResult<Arc<dyn Translator>>,
    ) -> bool {
        if generation != self.translator_generation {
            debug!(
                generation,
                current = self.translator_generation,
                "discarding stale translator"
            );
            return false;
        }

        self.translator = match result {
            Ok(handle) => {
                info!(capability = %Capability::Translator, pair = %self.pair(), "ready");
                CapabilityState::Ready(TranslatorHandle::Active(handle))
            }
            Err(e) => {
                info!(capability = %Capability::Translator, error = %e, "initialization failed");
                CapabilityState::Failed(e.to_string())
            }
        };
        true
    }

    /// The detector handle, if it is ready to be called.
    pub fn detector_handle(&self) -> CapabilityResult<Arc<dyn LanguageDetector>> {
        ready_handle(&self.detector, Capability::Detector).cloned()
    }

    /// The translator handle, if it is ready to be called.
    pub fn translator_handle(&self) -> CapabilityResult<TranslatorHandle> {
        ready_handle(&self.translator, Capability::Translator).cloned()
    }

    pub const fn detector(&self) -> &CapabilityState<Arc<dyn LanguageDetector>> {
        &self.detector
    }

    pub const fn translator(&self) -> &CapabilityState<TranslatorHandle> {
        &self.translator
    }

    pub fn native(&self) -> &str {
        &self.native
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(&self.native, &self.target)
    }
}

fn ready_handle<H>(state: &CapabilityState<H>, capability: Capability) -> CapabilityResult<&H> {
    match state {
        CapabilityState::Ready(handle) => Ok(handle),
        CapabilityState::Unavailable => Err(CapabilityError::Unavailable(capability)),
        CapabilityState::Failed(reason) => Err(CapabilityError::init_failed(capability, reason)),
        CapabilityState::Uninitialized | CapabilityState::Initializing => {
            Err(CapabilityError::NotReady(capability))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::capability::NoCapabilities;
    use crate::capability::testing::ScriptedHost;

    fn loader(host: ScriptedHost, target: &str) -> CapabilityLoader {
        CapabilityLoader::new(Arc::new(host), "en", target)
    }

    #[test]
    fn test_unavailable_host() {
        let mut loader = CapabilityLoader::new(Arc::new(NoCapabilities), "en", "es");

        assert!(loader.load_detector().is_none());
        assert!(loader.load_translator().is_none());
        assert!(matches!(loader.detector(), CapabilityState::Unavailable));
        assert!(matches!(loader.translator(), CapabilityState::Unavailable));
        assert_eq!(
            loader.detector_handle().err(),
            Some(CapabilityError::Unavailable(Capability::Detector))
        );
    }

    #[test]
    fn test_unavailable_wins_over_native_shortcut() {
        let mut loader = CapabilityLoader::new(Arc::new(NoCapabilities), "en", "en");

        assert!(loader.load_translator().is_none());
        assert!(matches!(loader.translator(), CapabilityState::Unavailable));
    }

    #[test]
    fn test_native_target_is_passthrough() {
        let host = ScriptedHost::default();
        let created = host.created_pairs.clone();
        let mut loader = loader(host, "en");

        assert!(loader.load_translator().is_none());

        let handle = loader.translator_handle().unwrap();
        assert!(handle.is_passthrough());
        assert!(created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detector_lifecycle() {
        let mut loader = loader(ScriptedHost::default(), "en");

        let Some(Acquisition::Detector { generation, task }) = loader.load_detector() else {
            panic!("expected detector acquisition");
        };
        assert!(matches!(loader.detector(), CapabilityState::Initializing));
        assert_eq!(
            loader.detector_handle().err(),
            Some(CapabilityError::NotReady(Capability::Detector))
        );

        assert!(loader.complete_detector(generation, task.await));
        assert!(loader.detector().is_ready());
    }

    #[tokio::test]
    async fn test_translator_init_failure() {
        let host = ScriptedHost {
            fail_create: true,
            ..ScriptedHost::default()
        };
        let mut loader = loader(host, "fr");

        let Some(Acquisition::Translator {
            generation,
            pair,
            task,
        }) = loader.load_translator()
        else {
            panic!("expected translator acquisition");
        };
        assert_eq!(pair, LanguagePair::new("en", "fr"));

        assert!(loader.complete_translator(generation, task.await));
        assert!(matches!(loader.translator(), CapabilityState::Failed(_)));
        assert!(matches!(
            loader.translator_handle(),
            Err(CapabilityError::InitFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_translator_is_discarded() {
        let mut loader = loader(ScriptedHost::default(), "pt");

        let Some(Acquisition::Translator {
            generation: stale,
            task: stale_task,
            ..
        }) = loader.load_translator()
        else {
            panic!("expected translator acquisition");
        };
        let Some(Acquisition::Translator {
            generation: fresh,
            task: fresh_task,
            ..
        }) = loader.select_target("es")
        else {
            panic!("expected translator acquisition");
        };

        assert!(loader.complete_translator(fresh, fresh_task.await));
        assert!(!loader.complete_translator(stale, stale_task.await));
        assert_eq!(loader.target(), "es");
        assert!(loader.translator().is_ready());
    }

    #[tokio::test]
    async fn test_reselecting_target_keeps_ready_translator() {
        let host = ScriptedHost::default();
        let created = host.created_pairs.clone();
        let mut loader = loader(host, "es");

        let Some(Acquisition::Translator { generation, task, .. }) = loader.load_translator()
        else {
            panic!("expected translator acquisition");
        };
        assert!(loader.select_target("es").is_none());
        assert!(loader.complete_translator(generation, task.await));

        assert!(loader.select_target("es").is_none());
        assert!(loader.translator().is_ready());
        assert_eq!(created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reselecting_target_retries_after_failure() {
        let host = ScriptedHost {
            fail_create: true,
            ..ScriptedHost::default()
        };
        let mut loader = loader(host, "tr");

        let Some(Acquisition::Translator { generation, task, .. }) = loader.load_translator()
        else {
            panic!("expected translator acquisition");
        };
        assert!(loader.complete_translator(generation, task.await));
        assert!(matches!(loader.translator(), CapabilityState::Failed(_)));

        assert!(loader.select_target("tr").is_some());
        assert!(matches!(loader.translator(), CapabilityState::Initializing));
    }

    #[tokio::test]
    async fn test_switching_to_native_drops_pending_acquisition() {
        let mut loader = loader(ScriptedHost::default(), "ru");

        let Some(Acquisition::Translator { generation, task, .. }) = loader.load_translator()
        else {
            panic!("expected translator acquisition");
        };
        assert!(loader.select_target("en").is_none());

        assert!(!loader.complete_translator(generation, task.await));
        assert!(loader.translator_handle().unwrap().is_passthrough());
    }
}
