//! In-memory conversation state.

mod message;
mod store;

pub use message::{DetectedLanguage, Message, MessageId, MessagePatch};
pub use store::ConversationStore;
