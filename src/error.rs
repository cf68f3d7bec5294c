use thiserror::Error;

// ─── Conversation shape ─────────────────────────────────────────────────────

/// Rejections of a list-form request before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("request has to be a list of messages with at least one user message")]
    Empty,

    #[error("the first and last message have to be user messages")]
    Endpoints,

    #[error("user and assistant messages have to alternate")]
    Alternation,

    #[error("list-form requests may only contain user and assistant messages")]
    ForbiddenRole,
}

// ─── Completion (network / provider) ────────────────────────────────────────

/// Failures from the model endpoint. These are transport or provider errors,
/// never data-quality errors, so the orchestrator retries but never repairs
/// them.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} response decode failed: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("no completion content in {provider} response")]
    MissingContent { provider: &'static str },
}

// ─── Extraction ─────────────────────────────────────────────────────────────

/// Failures of the brace-balance scan over the raw completion text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Max JSON search depth of {0} reached")]
    SearchExhausted(u32),

    #[error("Max JSON parentheses depth of {0} reached")]
    DepthExceeded(u32),
}

// ─── Validation ─────────────────────────────────────────────────────────────

/// Failures of the candidate-to-schema check.
///
/// `Parse` and `Schema` describe the candidate and are repair-eligible;
/// `Oracle` means the type-check oracle itself could not run and is
/// terminal.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("{diagnostic}")]
    Schema { diagnostic: String },

    #[error("type-check oracle failed: {0}")]
    Oracle(String),
}

impl ValidationError {
    /// Whether feeding the diagnostic back to the model can plausibly fix
    /// the candidate.
    pub fn is_repairable(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Schema { .. })
    }
}

// ─── Umbrella ───────────────────────────────────────────────────────────────

/// One translation failure, tagged by stage so the orchestrator can decide
/// between retry, repair, and terminal failure.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{0}")]
    Conversation(#[from] ConversationError),

    #[error("{0}")]
    Completion(#[from] CompletionError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl TranslateError {
    /// Whether this failure may be sent back to the model for one repair
    /// cycle. Conversation and completion failures never qualify; oracle
    /// breakage is environmental, not a property of the candidate.
    pub fn is_repairable(&self) -> bool {
        match self {
            Self::Conversation(_) | Self::Completion(_) => false,
            Self::Extraction(_) => true,
            Self::Validation(err) => err.is_repairable(),
        }
    }
}
