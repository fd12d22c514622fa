//! HLS live/VOD classification
//!
//! A playlist is finite when any of these holds, checked in this order:
//!
//!   1. it contains `#EXT-X-ENDLIST`
//!   2. its `#EXT-X-PLAYLIST-TYPE` value is `VOD` (case-insensitive)
//!   3. its `#EXT-X-MEDIA-SEQUENCE` value is exactly zero
//!
//! and live otherwise. A tag that is present but does not carry a value in
//! the expected shape is an error, and so is any fetch failure; the public
//! [`classify_playlist_liveness`] turns every error into "not live".

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::http::transport::{FetchRequest, Transport};
use crate::utils::UrlUtils;

pub const ENDLIST_TAG: &str = "#EXT-X-ENDLIST";
pub const PLAYLIST_TYPE_TAG: &str = "#EXT-X-PLAYLIST-TYPE";
pub const MEDIA_SEQUENCE_TAG: &str = "#EXT-X-MEDIA-SEQUENCE";

// Value runs to the end of the line; CR is not part of it.
static PLAYLIST_TYPE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"#EXT-X-PLAYLIST-TYPE:([^\r\n]*)").ok());

static MEDIA_SEQUENCE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"#EXT-X-MEDIA-SEQUENCE:([0-9]+)").ok());

/// Which rule decided the classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessVerdict {
    EndList,
    VodPlaylistType,
    ZeroMediaSequence,
    Live,
}

impl LivenessVerdict {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Evaluate the liveness rules against a playlist body.
pub fn inspect_playlist(body: &str) -> AppResult<LivenessVerdict> {
    if body.contains(ENDLIST_TAG) {
        return Ok(LivenessVerdict::EndList);
    }

    if body.contains(PLAYLIST_TYPE_TAG) {
        let captures = PLAYLIST_TYPE_RE
            .as_ref()
            .and_then(|re| re.captures(body))
            .ok_or_else(|| AppError::playlist(PLAYLIST_TYPE_TAG, "tag has no ':' value"))?;
        if captures[1].to_uppercase() == "VOD" {
            return Ok(LivenessVerdict::VodPlaylistType);
        }
    }

    if body.contains(MEDIA_SEQUENCE_TAG) {
        let captures = MEDIA_SEQUENCE_RE
            .as_ref()
            .and_then(|re| re.captures(body))
            .ok_or_else(|| AppError::playlist(MEDIA_SEQUENCE_TAG, "tag has no numeric value"))?;
        // Exact zero test without parsing, so oversized sequence numbers cannot overflow
        if captures[1].bytes().all(|b| b == b'0') {
            return Ok(LivenessVerdict::ZeroMediaSequence);
        }
    }

    Ok(LivenessVerdict::Live)
}

/// Fetch a playlist and report which liveness rule applies.
pub async fn check_playlist_liveness(
    transport: &dyn Transport,
    url: &str,
) -> AppResult<LivenessVerdict> {
    let body = transport.request(FetchRequest::get(url)).await?.into_text();
    inspect_playlist(&body)
}

/// True when the playlist at `url` is a live stream. Every failure reads as
/// not live.
pub async fn classify_playlist_liveness(transport: &dyn Transport, url: &str) -> bool {
    match check_playlist_liveness(transport, url).await {
        Ok(verdict) => {
            debug!(
                target = "media.classify",
                url = %UrlUtils::obfuscate_credentials(url),
                verdict = ?verdict,
                "playlist liveness"
            );
            verdict.is_live()
        }
        Err(e) => {
            warn!(
                target = "media.classify",
                url = %UrlUtils::obfuscate_credentials(url),
                "playlist liveness check failed, assuming not live: {}",
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:6
#EXT-X-MEDIA-SEQUENCE:42
#EXTINF:6.0,
seg42.ts
#EXTINF:6.0,
seg43.ts
";

    const VOD: &str = "#EXTM3U
#EXT-X-PLAYLIST-TYPE:VOD
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:1
#EXTINF:10.0,
a.ts
";

    #[test]
    fn test_sliding_window_is_live() {
        assert_eq!(inspect_playlist(LIVE).unwrap(), LivenessVerdict::Live);
    }

    #[test]
    fn test_endlist_is_finite() {
        let body = format!("{LIVE}#EXT-X-ENDLIST\n");
        assert_eq!(inspect_playlist(&body).unwrap(), LivenessVerdict::EndList);
    }

    #[test]
    fn test_vod_type_is_finite() {
        assert_eq!(inspect_playlist(VOD).unwrap(), LivenessVerdict::VodPlaylistType);
        let lower = VOD.replace("VOD", "vod");
        assert_eq!(inspect_playlist(&lower).unwrap(), LivenessVerdict::VodPlaylistType);
    }

    #[test]
    fn test_vod_type_with_crlf_line_endings() {
        let crlf = VOD.replace('\n', "\r\n");
        assert_eq!(inspect_playlist(&crlf).unwrap(), LivenessVerdict::VodPlaylistType);
    }

    #[test]
    fn test_event_type_falls_through_to_sequence() {
        let body = "#EXTM3U\n#EXT-X-PLAYLIST-TYPE:EVENT\n#EXT-X-MEDIA-SEQUENCE:7\n";
        assert_eq!(inspect_playlist(body).unwrap(), LivenessVerdict::Live);

        let body = "#EXTM3U\n#EXT-X-PLAYLIST-TYPE:EVENT\n#EXT-X-MEDIA-SEQUENCE:0\n";
        assert_eq!(inspect_playlist(body).unwrap(), LivenessVerdict::ZeroMediaSequence);
    }

    #[test]
    fn test_zero_media_sequence_is_finite() {
        assert_eq!(
            inspect_playlist("#EXTM3U\n#EXT-X-MEDIA-SEQUENCE:0\nseg0.ts\n").unwrap(),
            LivenessVerdict::ZeroMediaSequence
        );
        assert_eq!(
            inspect_playlist("#EXT-X-MEDIA-SEQUENCE:000\n").unwrap(),
            LivenessVerdict::ZeroMediaSequence
        );
    }

    #[test]
    fn test_huge_sequence_numbers_do_not_overflow() {
        let body = "#EXT-X-MEDIA-SEQUENCE:99999999999999999999999999\n";
        assert_eq!(inspect_playlist(body).unwrap(), LivenessVerdict::Live);
    }

    #[test]
    fn test_no_tags_is_live() {
        assert_eq!(inspect_playlist("#EXTM3U\nseg.ts\n").unwrap(), LivenessVerdict::Live);
        assert_eq!(inspect_playlist("").unwrap(), LivenessVerdict::Live);
    }

    #[test]
    fn test_malformed_tags_are_errors() {
        assert!(matches!(
            inspect_playlist("#EXT-X-MEDIA-SEQUENCE: 5\n"),
            Err(AppError::Playlist { .. })
        ));
        assert!(matches!(
            inspect_playlist("#EXT-X-PLAYLIST-TYPE\n"),
            Err(AppError::Playlist { .. })
        ));
    }

    #[test]
    fn test_endlist_short_circuits_malformed_tags() {
        let body = "#EXT-X-MEDIA-SEQUENCE:abc\n#EXT-X-ENDLIST\n";
        assert_eq!(inspect_playlist(body).unwrap(), LivenessVerdict::EndList);
    }
}
