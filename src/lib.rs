//! Media URL classification and disguised fetching for playback clients.
//!
//! The building blocks are free functions over a [`http::Transport`]; the
//! [`services::MediaProbe`] facade bundles a transport and an
//! [`context::AppContext`] for application use.

pub mod classification;
pub mod config;
pub mod context;
pub mod errors;
pub mod fetch;
pub mod http;
pub mod services;
pub mod utils;

pub use classification::{AddressFamily, LivenessVerdict, MediaFormat, ProbeFailure, ProbeOutcome};
pub use errors::{AppError, AppResult, TransportError};
pub use fetch::{ConfigPayload, FetchOptions};
pub use services::MediaProbe;
