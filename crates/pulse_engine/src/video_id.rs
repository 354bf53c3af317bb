use once_cell::sync::Lazy;
use regex::Regex;

use crate::{PipelineError, VideoId};

static WATCH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://(?:www\.)?youtube\.com/watch\?v=([A-Za-z0-9_-]{11})")
        .expect("watch url pattern")
});

/// Extracts the video id from a watch page address.
///
/// Anything that is not a `https://[www.]youtube.com/watch?v=...` address is
/// rejected before any network call is made.
pub fn parse_video_id(url: &str) -> Result<VideoId, PipelineError> {
    WATCH_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId::new(m.as_str()))
        .ok_or_else(|| PipelineError::InvalidPage {
            url: url.to_string(),
        })
}

