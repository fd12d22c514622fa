//! URL classification
//!
//! Exposes:
//!   - media_type: format token from URL heuristics, with a probe fallback
//!   - probe: HEAD request content-type mapping
//!   - host_family: IPv4 / IPv6 literal detection
//!   - liveness: HLS live vs. VOD from playlist tags
//!
//! Nothing here caches; every call classifies from scratch and concurrent
//! calls for the same URL issue independent requests.

pub mod host_family;
pub mod liveness;
pub mod media_type;
pub mod probe;

pub use host_family::{AddressFamily, classify_host_family};
pub use liveness::{LivenessVerdict, check_playlist_liveness, classify_playlist_liveness, inspect_playlist};
pub use media_type::{ExtensionVerdict, MediaFormat, classify_by_extension, classify_media_type};
pub use probe::{ProbeFailure, ProbeOutcome, match_content_type, probe_content_type};
