pub const MODEL_API_KEY_ENV_NAME: &str = "MNEMOPACK_MODEL_API_KEY";

pub const ACCESS_KEY_ENV_NAME: &str = "MNEMOPACK_ACCESS_KEY";

pub const USER_AGENT: &str = "MnemoPack Bot";

/// Character limit applied to loaded text when the caller doesn't set one.
pub const DEFAULT_MAX_CHARS: usize = 50_000;

pub const GOOGLE_DOCS_BASE_URL: &str = "https://docs.google.com";

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

pub const DEFAULT_TALK_API_URL: &str = "http://127.0.0.1:8100";

pub const DEFAULT_PACK_API_URL: &str = "https://api.mnemopack.com";

pub const DEFAULT_TRANSCRIPT_LANGUAGES: &[&str] = &["en"];

pub(crate) const GOOGLE_DOCS_MARKER: &str = "docs.google.com/document";

pub(crate) const YOUTUBE_URL_PATTERN: &str = concat!(
    r"^(?:https?://)?(?:www\.|m\.)?",
    r"(?:youtube|youtu|youtube-nocookie)\.(?:com|be)/",
    r"(?:watch\?v=|embed/|v/|shorts/|live/|.+[?&]v=)?",
    r"([A-Za-z0-9_-]{11})(?:[?&=%#/]|$)"
);

pub(crate) const PROMPT_PLACEHOLDER: &str = r"\{(second_brain_data|question)\}";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

pub(crate) const NOT_LOADED_REPLY: &str = "Please upload data to a second brain.";

pub(crate) const DEFAULT_PROMPT_TEMPLATE: &str = r#"
You are a second brain. Answer the question using only the knowledge below.
If the knowledge doesn't contain the answer, say that you don't know.
Keep the language of the question.

Knowledge:
{second_brain_data}

Question:
{question}"#;
