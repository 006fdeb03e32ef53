use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default embedding dimension.
pub const EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default max sequence length.
pub const MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Configuration for [`TextEmbedder`](super::TextEmbedder).
///
/// The model directory is expected to hold a sentence-encoder checkpoint in
/// the usual Hugging Face layout: `config.json`, `model.safetensors`, and
/// `tokenizer.json`.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Directory containing the model files.
    pub model_dir: PathBuf,
    /// Max tokens to consider per text.
    pub max_seq_len: usize,
    /// Output embedding dimension.
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: MAX_SEQ_LEN,
            embedding_dim: EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl EmbedderConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Path to the model config file.
    pub fn config_path(&self) -> PathBuf {
        self.model_dir.join("config.json")
    }

    /// Path to the model weights file.
    pub fn weights_path(&self) -> PathBuf {
        self.model_dir.join("model.safetensors")
    }

    /// Path to `tokenizer.json`.
    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join("tokenizer.json")
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.exists() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if all model files are present.
    pub fn model_available(&self) -> bool {
        self.config_path().is_file()
            && self.weights_path().is_file()
            && self.tokenizer_path().is_file()
    }
}
