// src/error.rs
use crate::parser::ParseError;
use std::io;

/// Application-level HTTP failure: a status code plus a message for logs.
/// Handlers return this to short-circuit dispatch with a classified status;
/// the dispatcher also uses it internally for routing failures.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: u16,
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(405, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

pub type HandlerResult = Result<crate::response::Response, HttpError>;

/// Error type for the serving layer (listener, connection I/O, head parse).
#[derive(Debug)]
pub enum ServeError {
    /// Underlying I/O error from the OS or network.
    Io(io::Error),
    /// Error during HTTP head parsing.
    Parse(ParseError),
    /// Generic or miscellaneous error.
    Other(String),
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::Io(e) => write!(f, "I/O error: {}", e),
            ServeError::Parse(e) => write!(f, "Parse error: {:?}", e),
            ServeError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(e: io::Error) -> Self {
        ServeError::Io(e)
    }
}

impl From<ParseError> for ServeError {
    fn from(e: ParseError) -> Self {
        ServeError::Parse(e)
    }
}

pub type ServeResult<T> = Result<T, ServeError>;
