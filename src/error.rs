use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// No topics were supplied.
    EmptyInput,
    InvalidRequest(String),
    /// Writing the finished PDF failed.
    Storage(std::io::Error),
    /// The final pass laid out pages differently from the planning pass.
    Pagination(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "no topics provided"),
            Error::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Error::Storage(e) => write!(f, "could not save document: {e}"),
            Error::Pagination(msg) => write!(f, "pagination mismatch: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e)
    }
}

/// Failure reported by a content source for a single topic.
///
/// Never aborts a build: the chapter body is replaced by the error text.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationError {
    pub message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GenerationError {}
