use serde_json::Value;

use crate::client::CompletionClient;
use crate::config::TranslatorOptions;
use crate::conversation::{TranslationRequest, Turn};
use crate::error::{TranslateError, ValidationError};
use crate::extract::extract_first_object;
use crate::prompt::{build_repair_prompt, build_request_prompt};
use crate::provider::{ImageAttachment, ProviderReply};
use crate::result::{TokenUsage, TranslationResult};
use crate::schema::Schema;
use crate::validate::SchemaValidator;

fn reply_usage(reply: &ProviderReply) -> TokenUsage {
    TokenUsage {
        prompt_tokens: reply.prompt_tokens,
        completion_tokens: reply.completion_tokens,
    }
}

/// Drives one request through prompt building, completion, extraction,
/// and validation, feeding the first data failure back to the model for
/// at most one repair round trip.
///
/// Completion failures are terminal here; transient trouble was already
/// retried by the client, and a transport error is not something a model
/// can correct.
pub struct JsonTranslator {
    client: CompletionClient,
    validator: SchemaValidator,
    options: TranslatorOptions,
}

impl JsonTranslator {
    pub fn new(client: CompletionClient, validator: SchemaValidator) -> Self {
        Self {
            client,
            validator,
            options: TranslatorOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: TranslatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Schema {
        self.validator.schema()
    }

    pub async fn translate(&self, request: impl Into<TranslationRequest>) -> TranslationResult {
        self.translate_with(request, None, false).await
    }

    /// Full-form entry point. `image` rides on the first user turn;
    /// `return_query_only` stops after the completion and hands back the
    /// raw model text, skipping extraction and validation.
    pub async fn translate_with(
        &self,
        request: impl Into<TranslationRequest>,
        image: Option<&ImageAttachment>,
        return_query_only: bool,
    ) -> TranslationResult {
        let request = request.into();
        let mut prompt = match build_request_prompt(&request, self.validator.schema()) {
            Ok(prompt) => prompt,
            Err(error) => return TranslationResult::failed(error.to_string()),
        };

        let mut attempt_repair = self.options.attempt_repair;

        loop {
            let reply = match self.client.complete(&prompt, image).await {
                Ok(reply) => reply,
                Err(error) => {
                    return TranslationResult::failed_with_audit(
                        error.to_string(),
                        prompt,
                        String::new(),
                        TokenUsage::default(),
                    );
                }
            };

            let usage = reply_usage(&reply);

            if return_query_only {
                return TranslationResult::raw(reply.text, prompt, usage);
            }

            let (failure, candidate) = match extract_first_object(&reply.text) {
                Ok(json_text) => match self.validator.validate(json_text).await {
                    Ok(data) => {
                        tracing::debug!(
                            type_name = self.validator.schema().type_name(),
                            "translation validated"
                        );
                        return TranslationResult::succeeded(data, prompt, reply.text, usage);
                    }
                    Err(error) => {
                        let candidate = json_text.to_string();
                        (TranslateError::from(error), candidate)
                    }
                },
                // No isolated object to point at; quote the whole reply.
                Err(error) => (TranslateError::from(error), reply.text.clone()),
            };

            if attempt_repair && failure.is_repairable() {
                tracing::info!(error = %failure, "candidate rejected, attempting repair");
                prompt.push(Turn::assistant(format!("```\n{candidate}\n```")));
                prompt.push(Turn::user(build_repair_prompt(&failure.to_string())));
                attempt_repair = false;
                continue;
            }

            let message = match &failure {
                // Candidate-level rejections quote the offender; oracle
                // breakage and missing JSON stand on their own.
                TranslateError::Validation(error) if error.is_repairable() => {
                    format!("JSON validation failed:\n{failure}\n{candidate}")
                }
                _ => failure.to_string(),
            };
            return TranslationResult::failed_with_audit(message, prompt, reply.text, usage);
        }
    }

    /// Validate candidate text directly, skipping the model round trip.
    /// Used to sanity-check schema example files on startup.
    pub async fn validate_candidate(&self, json_text: &str) -> Result<Value, ValidationError> {
        self.validator.validate(json_text).await
    }
}
