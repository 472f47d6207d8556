//! The classify module decides which retrieval strategy a URL needs.
//!
//! Classification is pure string matching and never touches the network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{GOOGLE_DOCS_MARKER, YOUTUBE_URL_PATTERN};

static YOUTUBE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(YOUTUBE_URL_PATTERN).expect("Failed to compile YOUTUBE_URL_PATTERN regex")
});

/// Kind of source behind a URL, with the identifier each strategy needs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// A YouTube video, loaded through its transcript.
    YouTubeVideo { video_id: String },
    /// A Google Docs document, loaded through the plain text export.
    GoogleDoc { doc_id: String },
    /// Anything else, scraped as HTML.
    GenericPage { url: String },
}

/// Classifies the URL. The first matching rule wins: YouTube, then
/// Google Docs, then a generic page.
///
/// # Arguments
///
/// * `url` - The URL as typed by the user
///
/// # Returns
///
/// The source kind carrying the video id, document id or the literal URL.
#[must_use]
pub fn classify(url: &str) -> SourceKind {
    if let Some(video_id) = youtube_video_id(url) {
        return SourceKind::YouTubeVideo { video_id };
    }

    if url.contains(GOOGLE_DOCS_MARKER)
        && let Some(doc_id) = google_doc_id(url)
    {
        return SourceKind::GoogleDoc { doc_id };
    }

    SourceKind::GenericPage {
        url: url.to_string(),
    }
}

/// Returns the 11-character video id when the URL points to a YouTube video.
#[must_use]
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_URL_REGEX
        .captures(url.trim())
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

/// Returns the path segment following `/d/`, cut at the next `/`, `?` or `#`.
#[must_use]
pub fn google_doc_id(url: &str) -> Option<String> {
    let (_, after) = url.split_once("/d/")?;
    let doc_id = after
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    (!doc_id.is_empty()).then(|| doc_id.to_string())
}

impl SourceKind {
    /// Short name of the strategy, used in log lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::YouTubeVideo { .. } => "YouTube video",
            Self::GoogleDoc { .. } => "Google Docs document",
            Self::GenericPage { .. } => "web page",
        }
    }
}
