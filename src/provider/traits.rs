use std::future::Future;
use std::pin::Pin;

use super::types::{ImageAttachment, ProviderReply};
use crate::config::ModelParams;
use crate::conversation::Turn;
use crate::error::CompletionError;

/// One model endpoint. Implementations map neutral turns onto their wire
/// format and normalize the reply; retry policy lives a layer up, in the
/// completion client.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai", "ollama").
    fn name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        turns: &'a [Turn],
        params: &'a ModelParams,
        image: Option<&'a ImageAttachment>,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply, CompletionError>> + Send + 'a>>;
}
