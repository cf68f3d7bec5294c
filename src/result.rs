use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::Turn;

/// Provider-reported token counts, passed through verbatim when the
/// endpoint supplies them and left empty otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens: Some(prompt_tokens),
            completion_tokens: Some(completion_tokens),
        }
    }

    pub fn total(&self) -> Option<u64> {
        match (self.prompt_tokens, self.completion_tokens) {
            (Some(prompt), Some(completion)) => Some(prompt + completion),
            _ => None,
        }
    }
}

/// The outcome of one translation, carrying the full audit trail: the
/// prompt that was actually sent, the raw model text, and usage counters.
/// Immutable once returned — stages either build a fresh result or forward
/// an existing one unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub success: bool,
    /// The schema-validated value on success, `None` on failure.
    pub data: Option<Value>,
    /// Empty on success; the stage diagnostic on failure.
    pub message: String,
    pub prompt: Vec<Turn>,
    pub raw_response: String,
    pub usage: TokenUsage,
}

impl TranslationResult {
    pub fn succeeded(
        data: Value,
        prompt: Vec<Turn>,
        raw_response: String,
        usage: TokenUsage,
    ) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: String::new(),
            prompt,
            raw_response,
            usage,
        }
    }

    /// A failure before any prompt was built, so there is no audit trail
    /// to keep.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            prompt: Vec::new(),
            raw_response: String::new(),
            usage: TokenUsage::default(),
        }
    }

    /// A failure that keeps the audit trail of the completion it rejects.
    pub fn failed_with_audit(
        message: impl Into<String>,
        prompt: Vec<Turn>,
        raw_response: String,
        usage: TokenUsage,
    ) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            prompt,
            raw_response,
            usage,
        }
    }

    /// The raw completion exposed unchanged, for "return query only" calls.
    pub fn raw(text: String, prompt: Vec<Turn>, usage: TokenUsage) -> Self {
        Self {
            success: true,
            data: None,
            message: String::new(),
            prompt,
            raw_response: text,
            usage,
        }
    }
}
