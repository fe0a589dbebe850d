//! Error types for med-flash.
//!
//! Each concern gets its own enum so callers can match on the failure they
//! care about. [`AppError`] wraps them all for the binary and the command bar.
//! None of these are fatal to the process: the study state turns every one of
//! them into a user-visible notice.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an uploaded document into plain text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("Could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The extension is known but the format is not handled (images, legacy Office).
    #[error("Unsupported document type '.{extension}' for '{path}'")]
    Unsupported { path: PathBuf, extension: String },

    /// No extension, or one we have never heard of.
    #[error("Unknown document type for '{path}'")]
    UnknownType { path: PathBuf },

    #[error("PDF '{path}' could not be parsed: {detail}")]
    Pdf { path: PathBuf, detail: String },

    #[error("Slide deck '{path}' could not be parsed: {detail}")]
    Slides { path: PathBuf, detail: String },

    #[error("Spreadsheet '{path}' could not be parsed: {detail}")]
    Spreadsheet { path: PathBuf, detail: String },

    #[error("'{path}' is not valid UTF-8 text")]
    Encoding { path: PathBuf },

    #[error("No text could be extracted from '{path}'")]
    Empty { path: PathBuf },
}

/// Failure talking to the hosted text-generation service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key set. Use `key <api-key>` or OPENAI_API_KEY.")]
    MissingApiKey,

    #[error("Request to '{endpoint}' failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 401/403 from the provider.
    #[error("Authentication rejected by the model provider (HTTP {status}). Check your API key.")]
    Auth { status: u16 },

    #[error("Model provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model '{model}' returned an empty response")]
    EmptyResponse { model: String },
}

/// The generation response could not be turned into a valid deck.
///
/// Any of these rejects the whole deck.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Response is not valid JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("Response is not a list of questions")]
    NotAList,

    #[error("Response contained no questions")]
    NoQuestions,

    #[error("Question {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    #[error("Question {index} has {found} options, expected 4")]
    OptionCount { index: usize, found: usize },

    #[error("Question {index} has an invalid option label '{label}'")]
    OptionLabel { index: usize, label: String },

    #[error("Question {index} names '{answer}' as correct, which is not one of its options")]
    AnswerNotInOptions { index: usize, answer: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Deck name cannot be empty")]
    EmptyName,

    #[error("A deck named '{0}' already exists. Delete it first.")]
    DuplicateDeck(String),

    #[error("No deck named '{0}'")]
    UnknownDeck(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No exam in progress")]
    NotInProgress,

    #[error("Select an answer before submitting")]
    NoSelection,

    #[error("'{0}' is not an option for this question")]
    UnknownOption(String),

    #[error("This question has already been answered")]
    AlreadyAnswered,

    #[error("Submit an answer before moving on")]
    NotAnswered,
}

/// Top-level error for study operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Verify/generate was requested before any document was loaded.
    #[error("Load a document first with `load <path>`")]
    NoContent,

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
