//! Errors reported by the content extractor.
//!
//! Every variant is recoverable: the caller shows the message and the user
//! may trigger another load.

use thiserror::Error;

/// Reasons a URL could not be turned into second brain text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The video has no retrievable captions (private, disabled, missing).
    #[error("transcript for YouTube video {video_id} is unavailable: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    /// The GET returned a non-200 status, or never produced a response.
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// A generic page URL isn't a valid URL.
    #[error("failed to parse {input}: {reason}")]
    ParseFailed { input: String, reason: String },

    /// Normalized text is longer than the caller's limit.
    #[error("content is too large: {actual_len} characters, max is {max_chars}")]
    TooLarge { actual_len: usize, max_chars: usize },
}

impl ExtractionError {
    /// HTTP status recorded for a failed fetch, if a response arrived at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FetchFailed { status, .. } => *status,
            _ => None,
        }
    }
}
