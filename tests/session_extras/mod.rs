use anyhow::{Result, bail};
use async_trait::async_trait;
use mnemopack::QaBackend;

/// Backend echoing its context and the question.
pub(crate) struct EchoBackend;

#[async_trait]
impl QaBackend for EchoBackend {
    async fn answer(&self, context: &str, question: &str) -> Result<Option<String>> {
        Ok(Some(format!("{context}|{question}")))
    }
}

pub(crate) struct SilentBackend;

#[async_trait]
impl QaBackend for SilentBackend {
    async fn answer(&self, _context: &str, _question: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

pub(crate) struct BrokenBackend;

#[async_trait]
impl QaBackend for BrokenBackend {
    async fn answer(&self, _context: &str, _question: &str) -> Result<Option<String>> {
        bail!("connection refused")
    }
}
