use tracing::{debug, trace};

use super::message::{Message, MessageId, MessagePatch};

/// Ordered, append-only list of messages for one session.
///
/// Messages are never removed or reordered; the only in-place change is
/// [`ConversationStore::update_message`].
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
    next_id: u64,
    input: String,
    default_language: String,
}

impl ConversationStore {
    /// Creates an empty store whose new messages target `default_language`.
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            input: String::new(),
            default_language: default_language.into(),
        }
    }

    /// Appends `content` as a new message.
    ///
    /// Returns `None` without touching the store when `content` is blank.
    /// The stored content is kept exactly as given.
    pub fn append(&mut self, content: impl Into<String>) -> Option<MessageId> {
        let content = content.into();
        if content.trim().is_empty() {
            trace!("ignoring blank message");
            return None;
        }

        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        self.messages
            .push(Message::new(id, content, self.default_language.clone()));
        debug!(message_id = id.get(), len = self.messages.len(), "message appended");
        Some(id)
    }

    /// Replaces the pending input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// The pending input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Appends the pending input and clears the buffer on success.
    pub fn submit(&mut self) -> Option<MessageId> {
        let id = self.append(self.input.clone())?;
        self.input.clear();
        Some(id)
    }

    /// Merges `patch` into the message with `id`.
    ///
    /// Returns `false` (and changes nothing) when no such message exists.
    pub fn update_message(&mut self, id: MessageId, patch: MessagePatch) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id() == id) else {
            debug!(message_id = id.get(), "update for unknown message ignored");
            return false;
        };

        message.apply(patch);
        trace!(message_id = id.get(), "message updated");
        true
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Target language given to newly appended messages.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn set_default_language(&mut self, lang: impl Into<String>) {
        self.default_language = lang.into();
    }
}
