//! Interchangeable LLM backends behind one call contract.

use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{Config, LlmProvider};
use crate::constants::{GROQ_MODEL, OLLAMA_MODEL};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no LLM provider configured")]
    Unavailable,

    #[error("LLM call failed: {reason}")]
    Provider { reason: String },

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// The active LLM backend, chosen once at startup. Call sites never branch on
/// a provider name; they see only [`call`](LlmBackend::call).
pub enum LlmBackend {
    Groq { client: Client, model: String },
    Ollama { client: Client, model: String },
    Disabled,
}

impl std::fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Groq { model, .. } => f.debug_struct("Groq").field("model", model).finish(),
            Self::Ollama { model, .. } => f.debug_struct("Ollama").field("model", model).finish(),
            Self::Disabled => write!(f, "Disabled"),
        }
    }
}

impl LlmBackend {
    /// Builds the backend selected by configuration. A Groq selection without
    /// `GROQ_API_KEY` in the environment degrades to `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match config.llm_provider {
            LlmProvider::Groq => {
                let has_key = std::env::var("GROQ_API_KEY")
                    .map(|v| !v.trim().is_empty())
                    .unwrap_or(false);
                if !has_key {
                    warn!("GROQ_API_KEY not set, LLM assistance disabled");
                    return Self::Disabled;
                }
                info!(model = GROQ_MODEL, "initialized Groq LLM backend");
                Self::Groq {
                    client: Client::default(),
                    model: GROQ_MODEL.to_string(),
                }
            }
            LlmProvider::Ollama => {
                info!(model = OLLAMA_MODEL, "initialized Ollama LLM backend");
                Self::Ollama {
                    client: Client::default(),
                    model: OLLAMA_MODEL.to_string(),
                }
            }
            LlmProvider::Disabled => {
                info!("LLM assistance disabled by configuration");
                Self::Disabled
            }
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Sends one system+user exchange and returns the model's text.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let (client, model) = match self {
            Self::Groq { client, model } | Self::Ollama { client, model } => (client, model),
            Self::Disabled => return Err(LlmError::Unavailable),
        };

        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);
        let options = ChatOptions::default()
            .with_temperature(temperature)
            .with_max_tokens(max_tokens);

        let response = client
            .exec_chat(model, request, Some(&options))
            .await
            .map_err(|e| {
                error!(error = %e, "LLM provider error");
                LlmError::Provider {
                    reason: e.to_string(),
                }
            })?;

        response
            .first_text()
            .map(str::to_string)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
