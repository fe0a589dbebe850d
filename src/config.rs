/// Runtime settings. Built by the binary from CLI flags and environment.
///
/// The API key is deliberately absent: it lives in the study state only.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    /// Questions per generated deck unless `generate` names a count.
    pub default_question_count: usize,
    /// Extracted content beyond this many chars is cut before prompting.
    pub max_prompt_chars: usize,
    /// Chars of extracted text shown on the content view.
    pub preview_chars: usize,
}

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Upper bound for `generate <name> <count>`.
pub const MAX_QUESTION_COUNT: usize = 50;

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            request_timeout_secs: 120,
            default_question_count: 5,
            max_prompt_chars: 12_000,
            preview_chars: 1_000,
        }
    }
}
