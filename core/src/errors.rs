use thiserror::Error;

use crate::i18n::TextKey;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Failure of a single conversation turn.
///
/// Both variants end the turn but leave the session usable; the user retries
/// by re-uploading the image or re-sending the message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    #[error("image analysis failed")]
    AnalysisFailed,

    #[error("chat response failed")]
    ResponseFailed,
}

impl TurnError {
    /// Localization key for the user-visible message
    pub fn text_key(self) -> TextKey {
        match self {
            TurnError::AnalysisFailed => TextKey::ErrorAnalyze,
            TurnError::ResponseFailed => TextKey::ErrorResponse,
        }
    }
}

/// A controller call refused before it touched the session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedCall {
    #[error("a request is already in flight")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,
}

/// Outcome of a one-shot controller call that did not succeed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    #[error(transparent)]
    Rejected(#[from] RejectedCall),

    #[error(transparent)]
    Failed(#[from] TurnError),
}

/// Errors raised while turning a file into an image payload
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image file is empty: {0}")]
    EmptyFile(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
