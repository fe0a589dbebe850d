//! Hosted text-generation service.
//!
//! The service is an opaque collaborator: a prompt goes in, text comes out.
//! [`TextGenerator`] is the seam; [`LlmClient`] is the HTTP implementation.

mod client;
mod parse;
mod prompts;
mod report;

use std::fmt;
use std::future::Future;

pub use client::LlmClient;
pub use parse::{parse_questions, strip_code_fences};
pub use prompts::{
    Difficulty, GenerationSettings, Prompt, SubjectArea, generation_prompt, verification_prompt,
};
pub use report::{Verdict, VerificationReport};

use crate::error::LlmError;

/// Anything that can turn a prompt into a completion.
pub trait TextGenerator {
    fn complete(
        &self,
        key: &ApiKey,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// User-supplied credential. Kept in memory only; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into().trim().to_string();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters, for the header bar.
    pub fn hint(&self) -> String {
        let tail: String = self.0.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
        format!("…{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("  sk-secret-1234 ").unwrap();
        assert_eq!(key.expose(), "sk-secret-1234");
        assert_eq!(format!("{:?}", key), "ApiKey(<redacted>)");
        assert_eq!(key.hint(), "…1234");
        assert!(ApiKey::new("   ").is_none());
    }
}
