//! Error type definitions for media-probe
//!
//! Transport failures are kept in their own enum so callers can tell a
//! network problem apart from a classification or decoding problem.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Underlying network call failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Strict URL parsing failure
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Character decoding could not be performed
    #[error("Decode error: {encoding} - {message}")]
    Decode { encoding: String, message: String },

    /// Playlist tag present but not in the expected shape
    #[error("Playlist error: {tag} - {message}")]
    Playlist { tag: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Failures raised by a `Transport` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Request failed: {url} - {message}")]
    Request { url: String, message: String },

    /// A body request came back with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read
    #[error("Failed to read body: {url} - {message}")]
    Body { url: String, message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a decode error for the given encoding label
    pub fn decode<E: Into<String>, M: Into<String>>(encoding: E, message: M) -> Self {
        Self::Decode {
            encoding: encoding.into(),
            message: message.into(),
        }
    }

    /// Create a playlist error for a malformed tag
    pub fn playlist<T: Into<String>, M: Into<String>>(tag: T, message: M) -> Self {
        Self::Playlist {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// True when the error came from the transport collaborator
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl TransportError {
    /// Create a request failure error
    pub fn request<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Request {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        Self::configuration(err.to_string())
    }
}
