use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─────────────────────────── Completion retry ───────────────────────────

/// Retry policy for the completion client. Every attempt is spaced by the
/// same fixed pause; `max_attempts` counts the first try.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_pause_secs")]
    pub pause_secs: u64,
}

impl RetryConfig {
    #[must_use]
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            pause_secs: default_pause_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_pause_secs() -> u64 {
    5
}

// ─────────────────────────── Model parameters ───────────────────────────

/// Model and wire-shaping parameters forwarded to the provider on every
/// completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Ask the provider to constrain output to JSON where supported.
    #[serde(default)]
    pub json_mode: bool,
    /// Send system turns as user messages, for models that reject or
    /// ignore a system role. Applied at serialization, after the image
    /// carrier has been chosen.
    #[serde(default)]
    pub system_as_user: bool,
}

impl ModelParams {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            json_mode: false,
            system_as_user: false,
        }
    }
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    1024
}

// ──────────────────────────── Client behavior ────────────────────────────

/// Reply handling applied by the client after a completion returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Drop `<think>...</think>` blocks from replies before they are
    /// returned to the caller.
    #[serde(default = "default_strip_reasoning")]
    pub strip_reasoning: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            strip_reasoning: default_strip_reasoning(),
        }
    }
}

fn default_strip_reasoning() -> bool {
    true
}

// ─────────────────────────── Type-check oracle ───────────────────────────

/// Where and how the external type checker runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Compiler binary resolved through `PATH` unless given as a path.
    #[serde(default = "default_oracle_command")]
    pub command: String,
    /// Directory for the per-check source artifacts. Falls back to the
    /// system temp dir.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

impl OracleConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            command: default_oracle_command(),
            scratch_dir: None,
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

fn default_oracle_command() -> String {
    "tsc".to_owned()
}

fn default_oracle_timeout_secs() -> u64 {
    60
}

// ──────────────────────────── Translator knobs ────────────────────────────

/// Behavior switches for the translation loop itself. Null-stripping is a
/// validator concern and is configured there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorOptions {
    /// Feed one validator diagnostic back to the model before giving up.
    #[serde(default = "default_attempt_repair")]
    pub attempt_repair: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            attempt_repair: default_attempt_repair(),
        }
    }
}

fn default_attempt_repair() -> bool {
    true
}
