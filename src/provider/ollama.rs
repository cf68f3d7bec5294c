use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::http;
use super::traits::Provider;
use super::types::{ImageAttachment, ProviderReply, wire_role};
use crate::config::ModelParams;
use crate::conversation::{Role, Turn};
use crate::error::CompletionError;

const PROVIDER_NAME: &str = "ollama";
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Chat adapter for a local Ollama server.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaProvider {
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            // Local models can be slow to first token.
            client: http::build_client(Duration::from_secs(300)),
        }
    }

    fn build_request(
        turns: &[Turn],
        params: &ModelParams,
        image: Option<&ImageAttachment>,
    ) -> ChatRequest {
        let mut image = image;
        let mut messages = Vec::with_capacity(turns.len());

        for turn in turns {
            // Ollama takes raw base64 in an `images` array on the turn.
            // The carrier is chosen by the turn's own role, before demotion
            // applies.
            let images = if turn.role == Role::User
                && let Some(attachment) = image.take()
            {
                Some(vec![attachment.data.clone()])
            } else {
                None
            };

            messages.push(Message {
                role: wire_role(turn.role, params.system_as_user),
                content: turn.text.clone(),
                images,
            });
        }

        ChatRequest {
            model: params.model.clone(),
            messages,
            stream: false,
            format: params.json_mode.then_some("json"),
            options: Options {
                temperature: params.temperature,
                num_predict: params.max_tokens,
            },
        }
    }

    async fn call_api(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| CompletionError::Http {
                provider: PROVIDER_NAME,
                source,
            })?;

        if !response.status().is_success() {
            return Err(http::api_error(PROVIDER_NAME, response).await);
        }

        response
            .json()
            .await
            .map_err(|source| CompletionError::Decode {
                provider: PROVIDER_NAME,
                source,
            })
    }
}

impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn complete<'a>(
        &'a self,
        turns: &'a [Turn],
        params: &'a ModelParams,
        image: Option<&'a ImageAttachment>,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply, CompletionError>> + Send + 'a>> {
        Box::pin(async move {
            let request = Self::build_request(turns, params, image);
            let chat_response = self.call_api(&request).await?;

            let text = chat_response.message.content;
            let mut reply = match (chat_response.prompt_eval_count, chat_response.eval_count) {
                (Some(prompt_tokens), Some(completion_tokens)) => {
                    ProviderReply::with_usage(text, prompt_tokens, completion_tokens)
                }
                _ => ProviderReply::text_only(text),
            };

            if let Some(api_model) = chat_response.model {
                reply = reply.with_model(api_model);
            }

            Ok(reply)
        })
    }
}
