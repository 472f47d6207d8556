use anyhow::{Result, anyhow};
use async_trait::async_trait;
use mnemopack::youtube::{TranscriptEntry, TranscriptSource};

/// Transcript source answering from memory, or failing when no entries are set.
pub(crate) struct StubTranscripts {
    entries: Option<Vec<TranscriptEntry>>,
}

impl StubTranscripts {
    pub fn with_captions(captions: &[&str]) -> Self {
        let entries = captions
            .iter()
            .enumerate()
            .map(|(index, text)| TranscriptEntry {
                text: (*text).to_string(),
                start: index as f64 * 2.0,
                duration: 2.0,
            })
            .collect();

        StubTranscripts {
            entries: Some(entries),
        }
    }

    pub fn unavailable() -> Self {
        StubTranscripts { entries: None }
    }
}

#[async_trait]
impl TranscriptSource for StubTranscripts {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        self.entries
            .clone()
            .ok_or_else(|| anyhow!("subtitles are disabled for video {video_id}"))
    }
}
