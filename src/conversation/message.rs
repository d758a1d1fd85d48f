use std::fmt;
use std::str::FromStr;

/// Identifies one message for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = std::num::ParseIntError;

    /// Accepts `3` as well as `#3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        digits.parse().map(Self)
    }
}

/// The language a detector settled on for a message.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLanguage {
    /// Language code, or `"unknown"`.
    pub language: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl DetectedLanguage {
    pub fn is_unknown(&self) -> bool {
        self.language.is_empty() || self.language.eq_ignore_ascii_case("unknown")
    }
}

/// One submitted utterance plus the annotations derived from it.
///
/// `content` is fixed at creation; everything else changes only through
/// [`MessagePatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    content: String,
    translated: Option<String>,
    detected_lang: Option<DetectedLanguage>,
    selected_lang: String,
}

impl Message {
    pub(crate) fn new(id: MessageId, content: String, selected_lang: String) -> Self {
        Self {
            id,
            content,
            translated: None,
            detected_lang: None,
            selected_lang,
        }
    }

    pub const fn id(&self) -> MessageId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn translated(&self) -> Option<&str> {
        self.translated.as_deref()
    }

    pub const fn detected_lang(&self) -> Option<&DetectedLanguage> {
        self.detected_lang.as_ref()
    }

    pub fn selected_lang(&self) -> &str {
        &self.selected_lang
    }

    pub(crate) fn apply(&mut self, patch: MessagePatch) {
        if let Some(translated) = patch.translated {
            self.translated = Some(translated);
        }
        if let Some(detected) = patch.detected_lang {
            self.detected_lang = Some(detected);
        }
        if let Some(lang) = patch.selected_lang {
            self.selected_lang = lang;
        }
    }
}

/// Field updates for a single message. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub translated: Option<String>,
    pub detected_lang: Option<DetectedLanguage>,
    pub selected_lang: Option<String>,
}

impl MessagePatch {
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            translated: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn detected(detected: DetectedLanguage) -> Self {
        Self {
            detected_lang: Some(detected),
            ..Self::default()
        }
    }

    pub fn selected_lang(lang: impl Into<String>) -> Self {
        Self {
            selected_lang: Some(lang.into()),
            ..Self::default()
        }
    }
}
