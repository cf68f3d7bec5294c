#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod provider;
pub mod result;
pub mod schema;
pub mod translator;
pub mod validate;

pub use client::CompletionClient;
pub use config::{ClientConfig, ModelParams, OracleConfig, RetryConfig, TranslatorOptions};
pub use conversation::{Role, TranslationRequest, Turn};
pub use error::{
    CompletionError, ConversationError, ExtractionError, TranslateError, ValidationError,
};
pub use provider::{ImageAttachment, OllamaProvider, OpenAiProvider, Provider, ProviderReply};
pub use result::{TokenUsage, TranslationResult};
pub use schema::Schema;
pub use translator::JsonTranslator;
pub use validate::SchemaValidator;
