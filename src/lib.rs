//! The mnemopack library loads text from web pages, Google Docs and YouTube
//! transcripts into a second brain and answers questions about it, either
//! with a chat model or through the remote MnemoPack service.

pub mod classify;
pub mod constants;
pub mod error;
pub mod extract;
pub mod pack;
pub mod parse;
pub mod repl;
pub mod session;
pub mod talk;
pub mod youtube;

use serde::{Deserialize, Serialize};

/// Enum representing the type of a pack data unit.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataUnitType {
    /// A web page, loaded and preprocessed by the pack service
    #[default]
    PublicUrl,
    /// Text saved as is
    Text,
}

impl std::str::FromStr for DataUnitType {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "public_url" => Ok(DataUnitType::PublicUrl),
            "text" => Ok(DataUnitType::Text),
            _ => Err(format!("Invalid data unit type: {}", input)),
        }
    }
}

/// Enum representing one line typed into the chat shell.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ChatInput {
    /// Load the text behind a URL.
    Load { url: String },
    /// Clear the chat history.
    Clear,
    /// Leave the shell.
    Quit,
    /// Nothing to do.
    Empty,
    /// Ask the second brain.
    Ask { question: String },
}

impl From<&str> for ChatInput {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if let Some(url) = value.strip_prefix("/load")
            && (url.is_empty() || url.starts_with(char::is_whitespace))
        {
            return Self::Load {
                url: url.trim().to_string(),
            };
        }

        match value {
            "" => Self::Empty,
            "/clear" => Self::Clear,
            "/quit" | "/exit" => Self::Quit,
            question => Self::Ask {
                question: question.to_string(),
            },
        }
    }
}

pub use classify::{SourceKind, classify};
pub use error::ExtractionError;
pub use extract::Extractor;
pub use pack::PackClient;
pub use session::Session;
pub use talk::{LocalChain, QaBackend};
