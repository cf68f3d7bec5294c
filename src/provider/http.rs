use std::time::Duration;

use reqwest::Client;

use crate::error::CompletionError;

const MAX_API_ERROR_CHARS: usize = 200;

/// Shared HTTP client settings for the provider adapters. Per-request
/// total timeout varies by provider; pool tuning does not.
pub(in crate::provider) fn build_client(total_timeout: Duration) -> Client {
    Client::builder()
        .timeout(total_timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Truncate a provider error body so a misbehaving endpoint cannot flood
/// logs or repair prompts.
fn truncate_error_body(input: &str) -> String {
    if input.chars().count() <= MAX_API_ERROR_CHARS {
        return input.to_string();
    }

    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &input[..end])
}

/// Build a provider error from a failed HTTP response.
pub(in crate::provider) async fn api_error(
    provider: &'static str,
    response: reqwest::Response,
) -> CompletionError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());

    CompletionError::Api {
        provider,
        status,
        body: truncate_error_body(&body),
    }
}
