use serde::{Deserialize, Serialize};

use crate::error::ConversationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged unit in the exchange with the model. A prompt is an
/// ordered `Vec<Turn>`, mutated only by appending during repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// What the caller hands to `translate`: either a bare request string or a
/// pre-shaped list of turns (for example a running game dialogue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationRequest {
    Text(String),
    Turns(Vec<Turn>),
}

impl From<&str> for TranslationRequest {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TranslationRequest {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Turn>> for TranslationRequest {
    fn from(turns: Vec<Turn>) -> Self {
        Self::Turns(turns)
    }
}

/// Enforce the list-form request invariant: the sequence starts and ends
/// with a user turn and alternates user/assistant strictly in between.
/// System turns are not valid inside a request list; the prompt builder
/// emits the single schema-bearing system turn itself.
///
/// Violations are rejected here, before any prompt is built or network
/// call is made.
pub fn check_shape(turns: &[Turn]) -> Result<(), ConversationError> {
    if turns.is_empty() {
        return Err(ConversationError::Empty);
    }
    if turns.iter().any(|turn| turn.role == Role::System) {
        return Err(ConversationError::ForbiddenRole);
    }
    if turns[0].role != Role::User || turns[turns.len() - 1].role != Role::User {
        return Err(ConversationError::Endpoints);
    }
    for (index, turn) in turns.iter().enumerate() {
        let expected = if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        };
        if turn.role != expected {
            return Err(ConversationError::Alternation);
        }
    }
    Ok(())
}
