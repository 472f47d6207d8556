//! The session module holds the state of one conversation.
//!
//! A session owns its chat history and the loaded context. Nothing is
//! shared between sessions and nothing outlives the session.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::constants::NOT_LOADED_REPLY;
use crate::error::ExtractionError;
use crate::extract::Extractor;
use crate::talk::QaBackend;

/// Author of a chat message.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// What questions are asked against.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SessionContext {
    /// Text extracted from a URL, answered by the local chain.
    SecondBrain { text: String },
    /// A remote pack, answered by the pack service.
    Pack { pack_id: String },
}

impl SessionContext {
    /// The string handed to the QA backend.
    #[must_use]
    pub fn as_backend_context(&self) -> &str {
        match self {
            Self::SecondBrain { text } => text,
            Self::Pack { pack_id } => pack_id,
        }
    }
}

/// State of one conversation.
#[derive(Debug)]
pub struct Session {
    messages: Vec<Message>,
    context: Option<SessionContext>,
    max_chars: usize,
}

impl Session {
    /// Creates an empty session accepting loaded text of up to `max_chars` characters.
    #[must_use]
    pub fn new(max_chars: usize) -> Self {
        Self {
            messages: Vec::new(),
            context: None,
            max_chars,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Loads the text behind `url` as the session context.
    ///
    /// The size of any extracted text is noted in the history, oversized
    /// text included. On failure the previously loaded context is kept.
    ///
    /// # Returns
    ///
    /// The number of characters loaded.
    ///
    /// # Errors
    ///
    /// Returns the extraction error, see [`Extractor::extract`].
    pub async fn load(
        &mut self,
        extractor: &Extractor,
        url: &str,
    ) -> Result<usize, ExtractionError> {
        match extractor.extract(url, self.max_chars).await {
            Ok(text) => {
                let size = text.chars().count();
                info!("Second Brain size: {size}");
                self.note_size(size);
                self.context = Some(SessionContext::SecondBrain { text });
                Ok(size)
            }
            Err(error) => {
                if let ExtractionError::TooLarge { actual_len, .. } = &error {
                    self.note_size(*actual_len);
                }
                warn!("Unable to load {url}: {error}");
                Err(error)
            }
        }
    }

    /// Uses a remote pack as the session context.
    pub fn attach_pack(&mut self, pack_id: &str) {
        self.context = Some(SessionContext::Pack {
            pack_id: pack_id.to_string(),
        });
    }

    /// Asks a question and records both sides of the exchange.
    ///
    /// Without a loaded context the session replies with a hint instead of
    /// calling the backend. A backend without an answer adds nothing to the
    /// history.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails. The question stays in the history.
    pub async fn ask(&mut self, backend: &dyn QaBackend, question: &str) -> Result<Option<String>> {
        self.push(Role::User, question.to_string());

        let answer = match &self.context {
            Some(context) => {
                backend
                    .answer(context.as_backend_context(), question)
                    .await?
            }
            None => Some(NOT_LOADED_REPLY.to_string()),
        };

        if let Some(answer) = &answer {
            self.push(Role::Assistant, answer.clone());
        }

        Ok(answer)
    }

    pub fn clear_history(&mut self) {
        self.messages.clear();
    }

    fn note_size(&mut self, size: usize) {
        self.push(Role::User, format!("Second Brain size: {size}"));
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(Message {
            role,
            content,
            at: Utc::now(),
        });
    }
}
