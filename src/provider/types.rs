use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use crate::conversation::Role;

/// Base64 image payload carried alongside the first user turn of a prompt,
/// for translating requests about what is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub media_type: String,
    pub data: String,
}

impl ImageAttachment {
    pub fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            data: BASE64_STANDARD.encode(bytes),
        }
    }

    pub(in crate::provider) fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Normalized completion reply with optional usage accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReply {
    pub text: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub model: Option<String>,
}

impl ProviderReply {
    pub fn text_only(text: String) -> Self {
        Self {
            text,
            prompt_tokens: None,
            completion_tokens: None,
            model: None,
        }
    }

    pub fn with_usage(text: String, prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            text,
            prompt_tokens: Some(prompt_tokens),
            completion_tokens: Some(completion_tokens),
            model: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn total_tokens(&self) -> Option<u64> {
        match (self.prompt_tokens, self.completion_tokens) {
            (Some(prompt), Some(completion)) => Some(prompt + completion),
            _ => None,
        }
    }
}

/// Wire-format role for a turn. With `system_as_user` set, system turns go
/// out as user messages; the turn itself keeps its role, so image placement
/// still sees which turn is the real request.
pub(in crate::provider) fn wire_role(role: Role, system_as_user: bool) -> &'static str {
    match role {
        Role::System if system_as_user => "user",
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}
