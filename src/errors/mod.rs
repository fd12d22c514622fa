//! Centralized error handling for media-probe
//!
//! This module provides the error types shared by the fetchers, the
//! classifiers and the transport layer.
//!
//! # Error Categories
//!
//! - **Transport Errors**: the underlying network call failed or returned a
//!   non-success status for a body request
//! - **URL Errors**: strict URL parsing failures (hostname classification)
//! - **Decode Errors**: unknown character encoding labels for raw fetches
//! - **Playlist Errors**: a playlist tag is present but malformed
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! # Usage
//!
//! ```rust
//! use media_probe::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("missing [http] table"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for transport Results
pub type TransportResult<T> = Result<T, TransportError>;
