//! The repl module is the line based chat shell around a [`Session`].

use anyhow::Result;
use log::error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::ChatInput;
use crate::error::ExtractionError;
use crate::extract::Extractor;
use crate::session::Session;
use crate::talk::QaBackend;

const PROMPT: &str = "> ";

/// Collaborators the shell dispatches to.
pub struct ChatShell<'a> {
    /// Extractor serving `/load`, `None` when the session talks to a pack
    pub extractor: Option<&'a Extractor>,
    /// Backend answering questions
    pub backend: &'a dyn QaBackend,
}

/// Reads chat input line by line until `/quit` or end of input.
///
/// # Arguments
///
/// * `session` - The session state, updated by every line
/// * `shell` - Extractor and backend to use
/// * `reader` - Source of user input
/// * `writer` - Destination of replies
///
/// # Errors
///
/// Returns an error if reading input or writing a reply fails. Load and
/// backend failures are reported to the writer and don't stop the shell.
pub async fn run<R, W>(
    session: &mut Session,
    shell: &ChatShell<'_>,
    reader: R,
    writer: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    write_out(writer, PROMPT).await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match ChatInput::from(line.as_str()) {
            ChatInput::Quit => break,
            ChatInput::Empty => None,
            ChatInput::Clear => {
                session.clear_history();
                Some("Chat history cleared.".to_string())
            }
            ChatInput::Load { url } => Some(load(session, shell.extractor, &url).await),
            ChatInput::Ask { question } => Some(ask(session, shell.backend, &question).await),
        };

        if let Some(reply) = reply {
            write_out(writer, &format!("{reply}\n")).await?;
        }
        write_out(writer, PROMPT).await?;
    }

    Ok(())
}

async fn load(session: &mut Session, extractor: Option<&Extractor>, url: &str) -> String {
    let Some(extractor) = extractor else {
        return "Loading URLs is not available in this session.".to_string();
    };
    if url.is_empty() {
        return "Specify URL to a second brain: /load <url>".to_string();
    }

    describe_load(&session.load(extractor, url).await)
}

async fn ask(session: &mut Session, backend: &dyn QaBackend, question: &str) -> String {
    match session.ask(backend, question).await {
        Ok(Some(answer)) => answer,
        Ok(None) => "No answer received.".to_string(),
        Err(err) => {
            error!("Unable to answer: {err:#}");
            format!("Unable to answer: {err}")
        }
    }
}

/// Human readable outcome of a load.
#[must_use]
pub fn describe_load(outcome: &Result<usize, ExtractionError>) -> String {
    match outcome {
        Ok(size) => format!("Second Brain data loaded successfully! Size: {size} characters."),
        Err(ExtractionError::TooLarge { max_chars, .. }) => {
            format!("Second Brain data is too large to load! Max is {max_chars} characters.")
        }
        Err(ExtractionError::TranscriptUnavailable { .. }) => {
            "No transcript is available for this video.".to_string()
        }
        Err(error) => format!("Failed to load Second Brain: {error}"),
    }
}

async fn write_out<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
