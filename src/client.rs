use std::borrow::Cow;
use std::sync::Arc;

use crate::config::{ClientConfig, ModelParams, RetryConfig};
use crate::conversation::Turn;
use crate::error::CompletionError;
use crate::provider::{ImageAttachment, Provider, ProviderReply};

/// Decide whether a failed attempt should be tried again. The policy is
/// uniform across failure kinds; only the attempt cap ends the loop.
fn should_retry(attempt: u32, max_attempts: u32, _error: &CompletionError) -> bool {
    attempt + 1 < max_attempts
}

/// Remove `<think>...</think>` blocks, and the whitespace that follows
/// them, from a model reply. An opener without a closer is left alone.
fn strip_reasoning_markers(text: &str) -> Cow<'_, str> {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    if !text.contains(OPEN) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(open) = rest.find(OPEN) else {
            out.push_str(rest);
            break;
        };
        let Some(close) = rest[open + OPEN.len()..].find(CLOSE) else {
            out.push_str(rest);
            break;
        };

        out.push_str(&rest[..open]);
        let after = open + OPEN.len() + close + CLOSE.len();
        rest = rest[after..].trim_start();
    }

    Cow::Owned(out)
}

/// Retrying wrapper around a provider. Spaces attempts by a fixed pause,
/// strips reasoning markers from replies, and hands back the final
/// attempt's error untouched when the cap is reached.
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    params: ModelParams,
    config: ClientConfig,
    retry: RetryConfig,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn Provider>, params: ModelParams) -> Self {
        Self {
            provider,
            params,
            config: ClientConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one completion with retries. Transport, API, and decode
    /// failures all count against the same attempt budget.
    pub async fn complete(
        &self,
        turns: &[Turn],
        image: Option<&ImageAttachment>,
    ) -> Result<ProviderReply, CompletionError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.provider.complete(turns, &self.params, image).await {
                Ok(mut reply) => {
                    if attempt > 0 {
                        tracing::info!(
                            provider = self.provider.name(),
                            attempt = attempt + 1,
                            "completion recovered after retries"
                        );
                    }
                    if self.config.strip_reasoning {
                        reply.text = strip_reasoning_markers(&reply.text).into_owned();
                    }
                    return Ok(reply);
                }
                Err(error) => {
                    if !should_retry(attempt, max_attempts, &error) {
                        return Err(error);
                    }
                    tracing::warn!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        max_attempts,
                        error = %error,
                        "completion failed, retrying"
                    );
                    tokio::time::sleep(self.retry.pause()).await;
                    attempt += 1;
                }
            }
        }
    }
}
