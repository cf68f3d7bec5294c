mod http;
mod ollama;
mod openai;
mod traits;
mod types;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use traits::Provider;
pub use types::{ImageAttachment, ProviderReply};
