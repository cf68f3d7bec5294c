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

const PROVIDER_NAME: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model-name markers for reasoning models, which take
/// `max_completion_tokens` instead of `max_tokens`.
const REASONING_MARKERS: [&str; 3] = ["o1", "o3", "o4"];

/// Chat-completions adapter for the OpenAI API and compatible endpoints
/// (a custom `base_url` points it at any server speaking the same wire
/// format).
pub struct OpenAiProvider {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrlContent },
}

#[derive(Debug, Serialize)]
struct ImageUrlContent {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

fn is_reasoning_model(model: &str) -> bool {
    REASONING_MARKERS
        .iter()
        .any(|marker| model.contains(marker))
}

impl OpenAiProvider {
    pub fn new(api_key: &str, base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            auth_header: format!("Bearer {api_key}"),
            client: http::build_client(Duration::from_secs(120)),
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
            // The attachment rides on the first user turn. The carrier is
            // chosen by the turn's own role, before demotion applies, so a
            // demoted system preamble never takes the image.
            let content = if turn.role == Role::User
                && let Some(attachment) = image.take()
            {
                MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: turn.text.clone(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlContent {
                            url: attachment.data_url(),
                        },
                    },
                ])
            } else {
                MessageContent::Text(turn.text.clone())
            };

            messages.push(Message {
                role: wire_role(turn.role, params.system_as_user),
                content,
            });
        }

        let reasoning = is_reasoning_model(&params.model);

        ChatRequest {
            model: params.model.clone(),
            messages,
            temperature: params.temperature,
            max_tokens: (!reasoning).then_some(params.max_tokens),
            max_completion_tokens: reasoning.then_some(params.max_tokens),
            response_format: params.json_mode.then_some(ResponseFormat {
                r#type: "json_object",
            }),
        }
    }

    async fn call_api(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
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

impl Provider for OpenAiProvider {
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

            let text = chat_response
                .choices
                .first()
                .and_then(|choice| choice.message.content.clone())
                .ok_or(CompletionError::MissingContent {
                    provider: PROVIDER_NAME,
                })?;

            let mut reply = match chat_response.usage {
                Some(usage) => {
                    ProviderReply::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
                }
                None => ProviderReply::text_only(text),
            };

            if let Some(api_model) = chat_response.model {
                reply = reply.with_model(api_model);
            }

            Ok(reply)
        })
    }
}
