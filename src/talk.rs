//! The talk module answers questions about loaded second brain data.
//!
//! `QaBackend` is implemented by the local LLM chain here and by the remote
//! pack service in [`crate::pack`]. The backend is picked when the CLI
//! starts, the session only sees the trait.

use anyhow::Result;
use async_trait::async_trait;
use llm::chat::{ChatMessage, ChatProvider};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::constants::{DEFAULT_PROMPT_TEMPLATE, PROMPT_PLACEHOLDER, THINK_STRIPPER};

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

static PROMPT_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(PROMPT_PLACEHOLDER).expect("Failed to compile PROMPT_PLACEHOLDER regex")
});

/// Answers a question using a session context.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Answers `question` given the session `context`: the loaded text for
    /// the local chain, the pack id for the remote pack service.
    ///
    /// Returns `Ok(None)` when the backend produced no answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend can't be reached.
    async fn answer(&self, context: &str, question: &str) -> Result<Option<String>>;
}

/// Backend asking a chat model with the loaded text pasted into the prompt.
pub struct LocalChain<'a> {
    /// LLM model answering the questions
    pub model: &'a dyn ChatProvider,
    /// Prompt template with `{second_brain_data}` and `{question}` placeholders
    pub prompt_template: Option<&'a str>,
}

#[async_trait]
impl QaBackend for LocalChain<'_> {
    async fn answer(&self, context: &str, question: &str) -> Result<Option<String>> {
        ask_model(context, question, self).await.map(Some)
    }
}

/// Asks the chat model a question about the second brain data.
///
/// # Arguments
///
/// * `second_brain_data` - Text loaded into the session
/// * `question` - The user question
/// * `chain` - Model and prompt template to use
///
/// # Returns
///
/// Returns the model answer with any `<think>` block removed
///
/// # Errors
///
/// Returns an error if the LLM chat operation fails
pub async fn ask_model(
    second_brain_data: &str,
    question: &str,
    chain: &LocalChain<'_>,
) -> Result<String> {
    let prompt_template = chain.prompt_template.unwrap_or(DEFAULT_PROMPT_TEMPLATE);
    let prompt = render_prompt(prompt_template, second_brain_data, question);

    let messages = vec![ChatMessage::user().content(prompt).build()];
    debug!(
        "Asking model with {} characters of second brain data",
        second_brain_data.chars().count()
    );

    let response = chain
        .model
        .chat(&messages)
        .await
        .map_err(|err| anyhow::anyhow!("LLM error: {err}."))?
        .to_string();

    Ok(THINK_STRIPPER_REGEX
        .replace_all(&response, "")
        .trim()
        .to_owned())
}

/// Fills the prompt placeholders in one pass, so substituted text is never
/// expanded again. A template without `{second_brain_data}` gets the data
/// appended so the model always sees it.
#[must_use]
pub fn render_prompt(template: &str, second_brain_data: &str, question: &str) -> String {
    let prompt = PROMPT_PLACEHOLDER_REGEX.replace_all(template, |captures: &Captures<'_>| {
        match captures.get(1).map(|name| name.as_str()) {
            Some("second_brain_data") => second_brain_data.to_string(),
            Some("question") => question.to_string(),
            _ => String::new(),
        }
    });

    if template.contains("{second_brain_data}") {
        prompt.into_owned()
    } else {
        format!("{prompt}\n\n{second_brain_data}")
    }
}
