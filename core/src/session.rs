//! Session state for one interactive copywriting context.
//!
//! The session is a plain owned value. Only the conversation controller mutates
//! it; everything else reads through the accessors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::errors::TurnError;
use crate::i18n::{translate, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One chat turn. Immutable once appended to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A web citation returned with a grounded response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Raw image payload plus its MIME type
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl ImageData {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Ordered message log with copy-on-write sharing.
///
/// Cloning only bumps a reference count, so a snapshot taken before an
/// optimistic append can be restored by swapping the handle back.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Arc<Vec<Message>>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: Message) {
        Arc::make_mut(&mut self.messages).push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// True when both handles point at the same underlying storage
    pub fn shares_storage_with(&self, other: &Conversation) -> bool {
        Arc::ptr_eq(&self.messages, &other.messages)
    }
}

impl PartialEq for Conversation {
    fn eq(&self, other: &Self) -> bool {
        self.messages == other.messages
    }
}

impl Eq for Conversation {}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self {
            messages: Arc::new(messages),
        }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// User-visible error left behind by a failed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub kind: TurnError,
    pub message: String,
}

impl SessionError {
    pub fn localized(kind: TurnError, language: Language) -> Self {
        Self {
            kind,
            message: translate(kind.text_key(), language).to_string(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The live state of one user's interaction
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) active_image: Option<ImageData>,
    pub(crate) conversation: Conversation,
    pub(crate) pending: bool,
    pub(crate) last_error: Option<SessionError>,
    pub(crate) grounding_sources: Vec<Source>,
    pub(crate) language: Language,
    pub(crate) search_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Language::default(), false)
    }
}

impl Session {
    pub fn new(language: Language, search_enabled: bool) -> Self {
        Self {
            active_image: None,
            conversation: Conversation::new(),
            pending: false,
            last_error: None,
            grounding_sources: Vec::new(),
            language,
            search_enabled,
        }
    }

    pub fn active_image(&self) -> Option<&ImageData> {
        self.active_image.as_ref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn grounding_sources(&self) -> &[Source] {
        &self.grounding_sources
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }
}
