use std::fmt;
use std::sync::Arc;

use super::Translator;

/// Lifecycle of one acquired capability.
pub enum CapabilityState<H> {
    /// The host does not expose this capability.
    Unavailable,
    Uninitialized,
    Initializing,
    Ready(H),
    /// Acquisition failed; the handle is treated as absent until the next attempt.
    Failed(String),
}

impl<H> CapabilityState<H> {
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub const fn handle(&self) -> Option<&H> {
        match self {
            Self::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

impl<H> fmt::Debug for CapabilityState<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
            other => f.write_str(other.label()),
        }
    }
}

/// What a ready translator holds.
#[derive(Clone)]
pub enum TranslatorHandle {
    /// The target is the native language: nothing to translate.
    Passthrough,
    Active(Arc<dyn Translator>),
}

impl TranslatorHandle {
    pub const fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough)
    }
}

impl fmt::Debug for TranslatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => f.write_str("Passthrough"),
            Self::Active(_) => f.write_str("Active"),
        }
    }
}
