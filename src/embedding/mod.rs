//! Shared embedding provider.
//!
//! [`TextEmbedder`] wraps a MiniLM-class BERT sentence encoder. It is loaded
//! once at startup and shared behind an `Arc`; the model itself sits behind a
//! mutex so inference calls are serialized. Use [`EmbedderConfig::stub`] for
//! tests without model files.

/// Embedder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;


pub use config::{EMBEDDING_DIM, EmbedderConfig, MAX_SEQ_LEN};
pub use error::EmbeddingError;

use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use device::select_device;

enum EmbedderBackend {
    Model {
        model: Arc<Mutex<BertModel>>,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
    },
    Stub {
        device: Device,
    },
}

/// Sentence embedding generator (supports stub mode).
pub struct TextEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for TextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub { device } => format!("Stub({:?})", device),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl TextEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for embedder");

        if config.testing_stub {
            warn!("Embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub { device },
                config,
            });
        }

        if !config.model_available() {
            return Err(EmbeddingError::ModelNotFound {
                path: config.model_dir.clone(),
            });
        }

        let (model, tokenizer) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model: Arc::new(Mutex::new(model)),
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    fn load_model(
        config: &EmbedderConfig,
        device: &Device,
    ) -> Result<(BertModel, tokenizers::Tokenizer), EmbeddingError> {
        let tokenizer = tokenizers::Tokenizer::from_file(config.tokenizer_path()).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let config_content = std::fs::read_to_string(config.config_path())?;
        let bert_config: BertConfig = serde_json::from_str(&config_content).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to parse model config: {}", e),
            }
        })?;

        if config.embedding_dim > bert_config.hidden_size {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) exceeds model hidden_size ({})",
                    config.embedding_dim, bert_config.hidden_size
                ),
            });
        }

        // SAFETY: mmap of a read-only weights file owned by this process.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[config.weights_path()], DTYPE, device)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to read safetensors: {}", e),
        })?;

        // Sentence-transformers exports keep tensors at the root; classifier
        // exports nest them under a "bert" prefix.
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &bert_config)
        } else {
            BertModel::load(vb.clone(), &bert_config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to load BERT model: {}", e),
        })?;

        Ok((model, tokenizer))
    }

    /// Generates a unit-normalized embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EmbedderBackend::Stub { .. } => self.embed_stub(text),
        }
    }

    /// Generates unit-normalized embeddings for a batch of strings.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => texts
                .iter()
                .map(|text| self.embed_with_model(text, model, tokenizer, device))
                .collect(),
            EmbedderBackend::Stub { .. } => {
                texts.iter().map(|text| self.embed_stub(text)).collect()
            }
        }
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &Arc<Mutex<BertModel>>,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let mut tokens: Vec<u32> = encoding.get_ids().to_vec();
        if tokens.is_empty() {
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        if tokens.len() > self.config.max_seq_len {
            tokens.truncate(self.config.max_seq_len);
        }

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "Generating embedding"
        );

        let input_ids = Tensor::new(&tokens[..], device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::zeros((1, tokens.len()), DType::U32, device)?;

        // [1, seq, hidden] -> mean pooling over the sequence axis.
        let hidden = model.lock().forward(&input_ids, &token_type_ids, None)?;
        let pooled = hidden.mean(1)?.squeeze(0)?;

        let embedding = pooled
            .narrow(0, 0, self.config.embedding_dim)?
            .to_vec1::<f32>()?;

        Ok(Self::normalize(embedding))
    }

    fn embed_stub(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        let mut state = seed;

        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        Ok(Self::normalize(embedding))
    }

    fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub { .. })
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}
