//! Media-type classification by URL heuristics, with an HTTP probe fallback.
//!
//! The extension scan is a plain substring test in a fixed order: the first
//! entry of [`EXTENSION_SCAN`] found anywhere in the URL wins, regardless of
//! where in the URL it occurs. A path segment that merely contains a token
//! (".../avionics/...") is a false positive; that is an accepted limitation
//! of the heuristic.

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, warn};

use super::probe::probe_content_type;
use crate::http::transport::Transport;
use crate::utils::UrlUtils;

/// Short container/format token handed to the playback backend selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
pub enum MediaFormat {
    #[strum(serialize = "mp4")]
    #[serde(rename = "mp4")]
    Mp4,
    #[strum(serialize = "mkv")]
    #[serde(rename = "mkv")]
    Mkv,
    #[strum(serialize = "flv")]
    #[serde(rename = "flv")]
    Flv,
    #[strum(serialize = "m3u8")]
    #[serde(rename = "m3u8")]
    M3u8,
    #[strum(serialize = "avi")]
    #[serde(rename = "avi")]
    Avi,
    #[strum(serialize = "magnet")]
    #[serde(rename = "magnet")]
    Magnet,
    #[strum(serialize = "mov")]
    #[serde(rename = "mov")]
    Mov,
    #[strum(serialize = "wmv")]
    #[serde(rename = "wmv")]
    Wmv,
    #[strum(serialize = "3gp")]
    #[serde(rename = "3gp")]
    ThreeGp,
    /// Probe succeeded but the content type is not one we know
    #[strum(serialize = "unknown")]
    #[serde(rename = "unknown")]
    Unknown,
    /// Probe failed (non-200, missing content type, transport failure)
    #[strum(serialize = "error")]
    #[serde(rename = "error")]
    Error,
    /// Not a recognizable media URL (empty token)
    #[strum(serialize = "")]
    #[serde(rename = "")]
    Unclassified,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Substrings scanned in this order; first hit wins.
pub const EXTENSION_SCAN: &[(&str, MediaFormat)] = &[
    ("mp4", MediaFormat::Mp4),
    ("mkv", MediaFormat::Mkv),
    ("flv", MediaFormat::Flv),
    ("m3u8", MediaFormat::M3u8),
    ("avi", MediaFormat::Avi),
    ("magnet", MediaFormat::Magnet),
];

/// Outcome of the URL-only pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionVerdict {
    /// Empty, or not an `http*` / `magnet*` URL
    NotMedia,
    Matched(MediaFormat),
    /// Plausible URL with no known token; ask the server
    NeedsProbe,
}

/// Classify a URL from its text alone.
pub fn classify_by_extension(url: &str) -> ExtensionVerdict {
    if url.is_empty() || !(url.starts_with("http") || url.starts_with("magnet")) {
        return ExtensionVerdict::NotMedia;
    }

    EXTENSION_SCAN
        .iter()
        .find(|(token, _)| url.contains(token))
        .map(|(_, format)| ExtensionVerdict::Matched(*format))
        .unwrap_or(ExtensionVerdict::NeedsProbe)
}

/// Determine the format token for a URL.
///
/// Falls back to a HEAD probe when the URL carries no known token. Probe
/// failures are logged and surface as [`MediaFormat::Error`]; use
/// [`probe_content_type`] directly to get the failure reason.
pub async fn classify_media_type(transport: &dyn Transport, url: &str) -> MediaFormat {
    match classify_by_extension(url) {
        ExtensionVerdict::NotMedia => MediaFormat::Unclassified,
        ExtensionVerdict::Matched(format) => {
            debug!(
                target = "media.classify",
                url = %UrlUtils::obfuscate_credentials(url),
                format = format.as_str(),
                "classified by extension"
            );
            format
        }
        ExtensionVerdict::NeedsProbe => {
            let outcome = probe_content_type(transport, url).await;
            if let Some(failure) = &outcome.failure {
                warn!(
                    target = "media.classify",
                    url = %UrlUtils::obfuscate_credentials(url),
                    "content-type probe failed: {}",
                    failure
                );
            }
            outcome.format
        }
    }
}
