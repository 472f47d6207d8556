//! The extract module turns a URL into plain second brain text.
//!
//! Each call classifies the URL, fetches the content with a single request,
//! normalizes it and applies the caller's size limit. Nothing is cached,
//! every load goes to the network again.

use anyhow::Result;
use log::{debug, info, warn};
use url::Url;

use crate::classify::{SourceKind, classify};
use crate::constants::{GOOGLE_DOCS_BASE_URL, USER_AGENT};
use crate::error::ExtractionError;
use crate::parse::extract_text;
use crate::youtube::{TranscriptSource, YoutubeTranscripts, flatten_transcript};

/// Fetches and normalizes text behind YouTube, Google Docs and web page URLs.
pub struct Extractor {
    client: reqwest::Client,
    docs_base_url: String,
    transcripts: Box<dyn TranscriptSource>,
}

impl Extractor {
    /// Creates an extractor talking to the public Google Docs and YouTube hosts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            transcripts: Box::new(YoutubeTranscripts::new(client.clone())),
            client,
            docs_base_url: GOOGLE_DOCS_BASE_URL.to_string(),
        })
    }

    /// Overrides the host used for Google Docs exports.
    #[must_use]
    pub fn with_docs_base_url(mut self, base_url: &str) -> Self {
        self.docs_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_transcripts(mut self, transcripts: Box<dyn TranscriptSource>) -> Self {
        self.transcripts = transcripts;
        self
    }

    /// Extracts the text behind the URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to load
    /// * `max_chars` - Longest accepted text, in characters (inclusive)
    ///
    /// # Returns
    ///
    /// The whole normalized text. Oversized text is rejected, never truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The video has no transcript (`TranscriptUnavailable`)
    /// * The export or page request fails or isn't answered with 200 (`FetchFailed`)
    /// * A generic page URL isn't a valid URL (`ParseFailed`)
    /// * The text is longer than `max_chars` (`TooLarge`)
    pub async fn extract(&self, url: &str, max_chars: usize) -> Result<String, ExtractionError> {
        let kind = classify(url);
        info!("Loading {url} as {}", kind.label());

        let text = match kind {
            SourceKind::YouTubeVideo { video_id } => self.fetch_transcript(video_id).await?,
            SourceKind::GoogleDoc { doc_id } => {
                let export_url = self.google_doc_export_url(&doc_id);
                self.get_text(&export_url).await?
            }
            SourceKind::GenericPage { url } => {
                Url::parse(&url).map_err(|e| ExtractionError::ParseFailed {
                    input: url.clone(),
                    reason: e.to_string(),
                })?;
                extract_text(&self.get_text(&url).await?)
            }
        };

        let actual_len = text.chars().count();
        debug!("Extracted {actual_len} characters from {url}");

        if actual_len > max_chars {
            warn!("Text of {url} is too large: {actual_len} > {max_chars}");
            return Err(ExtractionError::TooLarge {
                actual_len,
                max_chars,
            });
        }

        Ok(text)
    }

    /// Plain text export endpoint of a Google Docs document.
    #[must_use]
    pub fn google_doc_export_url(&self, doc_id: &str) -> String {
        format!(
            "{}/document/d/{doc_id}/export?format=txt",
            self.docs_base_url
        )
    }

    async fn fetch_transcript(&self, video_id: String) -> Result<String, ExtractionError> {
        match self.transcripts.fetch(&video_id).await {
            Ok(entries) => {
                debug!("Video {video_id} transcript has {} entries", entries.len());
                Ok(flatten_transcript(&entries))
            }
            Err(error) => {
                warn!("Transcript of video {video_id} is unavailable: {error:#}");
                Err(ExtractionError::TranscriptUnavailable {
                    video_id,
                    reason: format!("{error:#}"),
                })
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, ExtractionError> {
        let fetch_failed = |status: Option<u16>, reason: String| ExtractionError::FetchFailed {
            url: url.to_string(),
            status,
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_failed(None, e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("Skipping {url} as {status}");
            return Err(fetch_failed(
                Some(status.as_u16()),
                format!("responded with {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| fetch_failed(Some(status.as_u16()), e.to_string()))
    }
}
