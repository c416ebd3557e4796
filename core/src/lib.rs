// Core of the product copywriting assistant:
// - Gemini API client for image analysis and refinement chat
// - Session state and the conversation controller that owns it
// - Localized UI strings and prompt text
// - Configuration loading
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::{ChatReply, CopyGenerator, GeminiClient};

// Export types module - Request/response data structures
pub mod types;

// Export config module - Configuration loading
pub mod config;
pub use config::CopywriterConfig;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

pub mod capture;
pub mod controller;
pub use controller::{AnalysisTicket, ChatTicket, ConversationController};

pub mod i18n;
pub use i18n::{translate, Language, TextKey};

pub mod prompts;

pub mod session;
pub use session::{Conversation, ImageData, Message, Role, Session, SessionError, Source};
