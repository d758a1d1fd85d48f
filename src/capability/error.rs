use std::fmt;

use thiserror::Error;

use crate::conversation::MessageId;

/// The two capabilities a host may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Detector,
    Translator,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detector => f.write_str("language detector"),
            Self::Translator => f.write_str("translator"),
        }
    }
}

/// Failures around acquiring and calling a capability.
///
/// None of these are fatal to a session: they are reported as diagnostics
/// and the affected message is simply left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The host does not expose the capability at all.
    #[error("{0} is unavailable (no provider configured)")]
    Unavailable(Capability),

    /// Acquisition was attempted and failed.
    #[error("{capability} failed to initialize: {reason}")]
    InitFailed {
        capability: Capability,
        reason: String,
    },

    /// The capability exists but acquisition has not finished.
    #[error("{0} is not ready yet")]
    NotReady(Capability),

    /// A single detect/translate call failed.
    #[error("{capability} request failed: {reason}")]
    OperationFailed {
        capability: Capability,
        reason: String,
    },

    /// Detection succeeded but no candidate passed the confidence filter.
    #[error("no confident language detected")]
    NoConfidentResult,

    #[error("no message {0}")]
    UnknownMessage(MessageId),

    #[error("unsupported target language: '{0}'")]
    UnsupportedLanguage(String),
}

impl CapabilityError {
    pub fn init_failed(capability: Capability, reason: impl fmt::Display) -> Self {
        Self::InitFailed {
            capability,
            reason: reason.to_string(),
        }
    }

    pub fn operation_failed(capability: Capability, reason: impl fmt::Display) -> Self {
        Self::OperationFailed {
            capability,
            reason: reason.to_string(),
        }
    }
}

/// Shorthand for results produced by capability calls.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_capability() {
        let err = CapabilityError::Unavailable(Capability::Detector);
        assert!(err.to_string().contains("language detector"));

        let err = CapabilityError::init_failed(Capability::Translator, "model not found");
        assert_eq!(
            err.to_string(),
            "translator failed to initialize: model not found"
        );
    }

    #[test]
    fn test_unknown_message_display() {
        let err = CapabilityError::UnknownMessage(MessageId::new(4));
        assert_eq!(err.to_string(), "no message #4");
    }
}
