//! Content-type probe
//!
//! Issues a HEAD request and maps the declared `content-type` to a format
//! token. Every entry of [`CONTENT_TYPE_TABLE`] whose key is a substring of
//! the header value is a match and later matches overwrite earlier ones, so
//! the table order is part of the contract.
//!
//! The outcome always carries a format token. When the probe failed it also
//! carries the reason, so callers can treat the token as final or inspect the
//! failure without a second error channel.

use thiserror::Error;
use tracing::info;

use super::media_type::MediaFormat;
use crate::errors::TransportError;
use crate::http::transport::{FetchRequest, Transport};
use crate::utils::UrlUtils;

/// MIME substring to format token, iterated in order; last match wins.
pub const CONTENT_TYPE_TABLE: &[(&str, MediaFormat)] = &[
    ("video/mp4", MediaFormat::Mp4),
    ("video/x-flv", MediaFormat::Flv),
    ("application/vnd.apple.mpegurl", MediaFormat::M3u8),
    ("application/x-mpegURL", MediaFormat::M3u8),
    ("application/octet-stream", MediaFormat::M3u8),
    ("video/avi", MediaFormat::Avi),
    ("video/x-msvideo", MediaFormat::Avi),
    ("video/x-matroska", MediaFormat::Mkv),
    ("video/quicktime", MediaFormat::Mov),
    ("video/x-ms-wmv", MediaFormat::Wmv),
    ("video/3gpp", MediaFormat::ThreeGp),
];

/// Why a probe ended in [`MediaFormat::Error`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("response carried no content-type header")]
    MissingContentType,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Always set; `Error` whenever `failure` is set
    pub format: MediaFormat,
    pub failure: Option<ProbeFailure>,
}

impl ProbeOutcome {
    fn resolved(format: MediaFormat) -> Self {
        Self {
            format,
            failure: None,
        }
    }

    fn failed(failure: ProbeFailure) -> Self {
        Self {
            format: MediaFormat::Error,
            failure: Some(failure),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Collapse into a single result channel
    pub fn into_result(self) -> Result<MediaFormat, ProbeFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.format),
        }
    }
}

/// Map a content-type value through [`CONTENT_TYPE_TABLE`].
pub fn match_content_type(content_type: &str) -> MediaFormat {
    CONTENT_TYPE_TABLE
        .iter()
        .rev()
        .find(|(mime, _)| content_type.contains(mime))
        .map(|(_, format)| *format)
        .unwrap_or(MediaFormat::Unknown)
}

/// Probe a URL with a HEAD request and classify its content type.
///
/// Only a 200 response is inspected. Its `content-type` is matched against
/// [`CONTENT_TYPE_TABLE`], where the last matching entry wins.
///
/// # Arguments
/// * `transport` - Transport used for the HEAD request
/// * `url` - Media location to probe
///
/// # Returns
/// A [`ProbeOutcome`] whose `format` is always set. Non-200 statuses, a
/// missing `content-type` and transport failures give [`MediaFormat::Error`]
/// with the reason in `failure`.
///
/// # Examples
/// ```rust,no_run
/// use media_probe::classification::probe_content_type;
/// use media_probe::http::Transport;
///
/// # async fn run(transport: &dyn Transport) {
/// let outcome = probe_content_type(transport, "https://cdn.example/play?id=7").await;
/// match outcome.into_result() {
///     Ok(format) => println!("playable as {format}"),
///     Err(reason) => eprintln!("probe failed: {reason}"),
/// }
/// # }
/// ```
pub async fn probe_content_type(transport: &dyn Transport, url: &str) -> ProbeOutcome {
    let outcome = match transport.request_complete(FetchRequest::head(url)).await {
        Ok(meta) if meta.status == 200 => match meta.header("content-type") {
            Some(content_type) => ProbeOutcome::resolved(match_content_type(content_type)),
            None => ProbeOutcome::failed(ProbeFailure::MissingContentType),
        },
        Ok(meta) => ProbeOutcome::failed(ProbeFailure::Status(meta.status)),
        Err(e) => ProbeOutcome::failed(ProbeFailure::Transport(e)),
    };

    info!(
        target = "media.classify",
        url = %UrlUtils::obfuscate_credentials(url),
        format = outcome.format.as_str(),
        failed = outcome.is_failure(),
        "media playback type"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("video/mp4", MediaFormat::Mp4)]
    #[case("video/mp4; charset=binary", MediaFormat::Mp4)]
    #[case("application/vnd.apple.mpegurl", MediaFormat::M3u8)]
    #[case("application/x-mpegURL", MediaFormat::M3u8)]
    #[case("application/octet-stream", MediaFormat::M3u8)]
    #[case("video/x-msvideo", MediaFormat::Avi)]
    #[case("video/quicktime", MediaFormat::Mov)]
    #[case("video/x-ms-wmv", MediaFormat::Wmv)]
    #[case("video/3gpp", MediaFormat::ThreeGp)]
    #[case("text/html; charset=utf-8", MediaFormat::Unknown)]
    #[case("", MediaFormat::Unknown)]
    fn test_content_type_mapping(#[case] content_type: &str, #[case] expected: MediaFormat) {
        assert_eq!(match_content_type(content_type), expected);
    }

    #[test]
    fn test_last_match_in_table_order_wins() {
        // both "video/mp4" and "video/x-matroska" are substrings; matroska is later
        assert_eq!(
            match_content_type("video/mp4, video/x-matroska"),
            MediaFormat::Mkv
        );
        assert_eq!(
            match_content_type("video/x-matroska, video/mp4"),
            MediaFormat::Mkv
        );
    }

    #[test]
    fn test_mime_match_is_case_sensitive() {
        assert_eq!(match_content_type("application/x-mpegurl"), MediaFormat::Unknown);
    }

    #[test]
    fn test_failed_outcome_converts_to_error() {
        let outcome = ProbeOutcome::failed(ProbeFailure::Status(404));
        assert_eq!(outcome.format, MediaFormat::Error);
        assert_eq!(outcome.into_result(), Err(ProbeFailure::Status(404)));

        let outcome = ProbeOutcome::resolved(MediaFormat::Unknown);
        assert_eq!(outcome.into_result(), Ok(MediaFormat::Unknown));
    }
}
