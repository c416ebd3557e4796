//! Conversation controller: the only code path that mutates a [`Session`].
//!
//! Every operation is split into a synchronous `begin_*` step, which applies
//! the immediate (optimistic) state change and hands back a ticket, and a
//! `complete_*` step, which applies the remote outcome. The async
//! [`ConversationController::ingest_image`] and
//! [`ConversationController::send_message`] run both steps around the remote
//! call. At most one ticket can be outstanding because `begin_*` refuses to
//! run while the session is pending.

use tracing::{error, info, warn};

use crate::client::{ChatReply, CopyGenerator};
use crate::errors::{CallError, GeminiResult, RejectedCall, TurnError};
use crate::i18n::Language;
use crate::session::{Conversation, ImageData, Message, Session, SessionError};

/// In-flight image analysis
#[derive(Debug)]
pub struct AnalysisTicket {
    image: ImageData,
    language: Language,
}

impl AnalysisTicket {
    pub fn image(&self) -> &ImageData {
        &self.image
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// In-flight chat turn.
///
/// `baseline` is the confirmed conversation before the optimistic user
/// message; it is both the history sent upstream and the rollback target.
#[derive(Debug)]
pub struct ChatTicket {
    baseline: Conversation,
    text: String,
    search_enabled: bool,
    language: Language,
}

impl ChatTicket {
    pub fn history(&self) -> &[Message] {
        self.baseline.messages()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

pub struct ConversationController<G> {
    generator: G,
    session: Session,
}

impl<G: CopyGenerator> ConversationController<G> {
    pub fn new(generator: G, session: Session) -> Self {
        Self { generator, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Takes effect for the next turn; an in-flight turn keeps its language
    pub fn set_language(&mut self, language: Language) {
        self.session.language = language;
    }

    pub fn set_search_enabled(&mut self, enabled: bool) {
        self.session.search_enabled = enabled;
    }

    /// Replace the active image and start over with an empty conversation
    pub fn begin_ingest(&mut self, image: ImageData) -> Result<AnalysisTicket, RejectedCall> {
        if self.session.pending {
            return Err(RejectedCall::Busy);
        }

        info!(mime_type = image.mime_type(), bytes = image.bytes().len(), "Ingesting image");

        self.session.active_image = Some(image.clone());
        self.session.conversation = Conversation::new();
        self.session.grounding_sources.clear();
        self.session.last_error = None;
        self.session.pending = true;

        Ok(AnalysisTicket {
            image,
            language: self.session.language,
        })
    }

    pub fn complete_ingest(
        &mut self,
        ticket: AnalysisTicket,
        outcome: GeminiResult<String>,
    ) -> Result<(), TurnError> {
        self.session.pending = false;

        match outcome {
            Ok(copy) => {
                info!(chars = copy.len(), "Image analysis finished");
                self.session.conversation.push(Message::model(copy));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Image analysis failed");
                let kind = TurnError::AnalysisFailed;
                self.session.last_error = Some(SessionError::localized(kind, ticket.language));
                Err(kind)
            }
        }
    }

    /// Optimistically append the user's message and start a chat turn
    pub fn begin_send(
        &mut self,
        text: &str,
        search_enabled: bool,
    ) -> Result<ChatTicket, RejectedCall> {
        if self.session.pending {
            return Err(RejectedCall::Busy);
        }
        if text.trim().is_empty() {
            return Err(RejectedCall::EmptyMessage);
        }

        let baseline = self.session.conversation.clone();
        self.session.conversation.push(Message::user(text));
        self.session.pending = true;
        self.session.last_error = None;
        self.session.grounding_sources.clear();

        info!(
            history = baseline.len(),
            search_enabled, "Sending chat message"
        );

        Ok(ChatTicket {
            baseline,
            text: text.to_string(),
            search_enabled,
            language: self.session.language,
        })
    }

    pub fn complete_send(
        &mut self,
        ticket: ChatTicket,
        outcome: GeminiResult<ChatReply>,
    ) -> Result<(), TurnError> {
        self.session.pending = false;

        match outcome {
            Ok(reply) => {
                info!(
                    chars = reply.text.len(),
                    sources = reply.sources.len(),
                    "Chat turn finished"
                );
                self.session.conversation.push(Message::model(reply.text));
                self.session.grounding_sources = if ticket.search_enabled {
                    reply.sources
                } else {
                    Vec::new()
                };
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Chat turn failed, restoring previous conversation");
                self.session.conversation = ticket.baseline;
                let kind = TurnError::ResponseFailed;
                self.session.last_error = Some(SessionError::localized(kind, ticket.language));
                Err(kind)
            }
        }
    }

    pub async fn ingest_image(&mut self, image: ImageData) -> Result<(), CallError> {
        let ticket = self.begin_ingest(image)?;
        let outcome = self
            .generator
            .analyze(ticket.image(), ticket.language())
            .await;
        self.complete_ingest(ticket, outcome)?;
        Ok(())
    }

    pub async fn send_message(&mut self, text: &str, search_enabled: bool) -> Result<(), CallError> {
        let ticket = self.begin_send(text, search_enabled)?;
        let outcome = self
            .generator
            .continue_chat(
                ticket.history(),
                ticket.text(),
                ticket.search_enabled(),
                ticket.language(),
            )
            .await;
        self.complete_send(ticket, outcome)?;
        Ok(())
    }
}
