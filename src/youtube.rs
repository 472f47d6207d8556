//! The youtube module retrieves video transcripts.
//!
//! The caption track list is read from the video watch page, one track is
//! chosen by language and its timed text XML is downloaded and decoded.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use log::{debug, info};
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::constants::{DEFAULT_TRANSCRIPT_LANGUAGES, YOUTUBE_BASE_URL};

/// One timed caption of a transcript.
#[derive(Clone, PartialEq, Debug)]
pub struct TranscriptEntry {
    pub text: String,
    /// Offset from the start of the video, in seconds.
    pub start: f64,
    pub duration: f64,
}

/// Anything able to deliver the transcript of a YouTube video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetches the transcript entries of a video in chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the video has no retrievable transcript or the
    /// captioning service can't be reached.
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>>;
}

/// Joins caption texts into one blob, one caption per line. Timing is dropped.
#[must_use]
pub fn flatten_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transcript source backed by the public YouTube watch page.
pub struct YoutubeTranscripts {
    client: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeTranscripts {
    /// Creates a transcript source talking to `https://www.youtube.com`.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: YOUTUBE_BASE_URL.to_string(),
            languages: DEFAULT_TRANSCRIPT_LANGUAGES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{url} responded with {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("Unable to read response body of {url}"))
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        let watch_html = self.get_text(&watch_url).await?;

        let tracks = parse_caption_tracks(&watch_html)?;
        debug!("Video {video_id} has {} caption tracks", tracks.len());

        let track = choose_track(&tracks, &self.languages)
            .ok_or_else(|| anyhow!("no captions available for video {video_id}"))?;
        info!(
            "Fetching {} transcript for video {video_id}",
            track.language_code
        );

        let transcript_xml = self
            .get_text(&track.base_url.replace("&fmt=srv3", ""))
            .await?;

        Ok(parse_transcript_xml(&transcript_xml))
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: TracklistRenderer,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// A caption track listed on the watch page.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `asr` for automatically generated captions.
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Reads the caption track list embedded in a watch page.
///
/// # Errors
///
/// Returns an error if the page carries no caption data (captions disabled,
/// video private or unavailable) or the embedded JSON can't be decoded.
pub fn parse_caption_tracks(watch_html: &str) -> Result<Vec<CaptionTrack>> {
    if watch_html.contains("class=\"g-recaptcha\"") {
        bail!("YouTube is rate limiting requests from this address");
    }

    let (_, after) = watch_html
        .split_once("\"captions\":")
        .ok_or_else(|| anyhow!("captions are disabled or the video is unavailable"))?;

    // Only the first JSON value matters, the rest of the page follows it.
    let captions: Captions = serde_json::Deserializer::from_str(after)
        .into_iter::<Captions>()
        .next()
        .ok_or_else(|| anyhow!("caption data is empty"))?
        .context("Unable to decode caption track list")?;

    let tracks = captions.player_captions_tracklist_renderer.caption_tracks;
    if tracks.is_empty() {
        bail!("the video has no caption tracks");
    }
    Ok(tracks)
}

/// Picks a manual track in a preferred language, then a generated one,
/// then whatever track comes first.
#[must_use]
pub fn choose_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    let in_language = |generated: bool| {
        languages.iter().find_map(|language| {
            tracks
                .iter()
                .find(|track| &track.language_code == language && track.is_generated() == generated)
        })
    };

    in_language(false)
        .or_else(|| in_language(true))
        .or_else(|| tracks.first())
}

/// Decodes timed text XML (`<text start=".." dur="..">..</text>` elements).
///
/// Caption text arrives escaped twice, so entities are decoded a second time
/// and any inline markup is stripped.
#[must_use]
pub fn parse_transcript_xml(xml: &str) -> Vec<TranscriptEntry> {
    let document = Html::parse_fragment(xml);
    let Ok(text_selector) = Selector::parse("text") else {
        return Vec::new();
    };

    document
        .select(&text_selector)
        .map(|element| {
            let escaped = element.text().collect::<String>();
            let attr = |name: &str| {
                element
                    .value()
                    .attr(name)
                    .and_then(|value| value.parse::<f64>().ok())
                    .unwrap_or_default()
            };

            TranscriptEntry {
                text: decode_caption(&escaped),
                start: attr("start"),
                duration: attr("dur"),
            }
        })
        .collect()
}

fn decode_caption(escaped: &str) -> String {
    Html::parse_fragment(escaped)
        .root_element()
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
