//! Single-entry recipe cache.
//!
//! Holds the most recent successful fetch together with its embeddings so the
//! ranker has something to fall back on when the catalog is unavailable. A
//! new successful fetch replaces the whole entry; recipes and embeddings swap
//! as one value, never independently.


use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::Recipe;
use crate::embedding::{EmbeddingError, TextEmbedder};

/// The live cache entry. Cloning is cheap (two `Arc`s and a timestamp).
#[derive(Debug, Clone)]
pub struct CachedSet {
    pub recipes: Arc<[Recipe]>,
    pub embeddings: Arc<[Vec<f32>]>,
    pub fetched_at: DateTime<Utc>,
}

/// Owns the single process-wide [`CachedSet`].
pub struct RecipeCache {
    embedder: Arc<TextEmbedder>,
    entry: RwLock<Option<CachedSet>>,
}

impl RecipeCache {
    pub fn new(embedder: Arc<TextEmbedder>) -> Self {
        Self {
            embedder,
            entry: RwLock::new(None),
        }
    }

    /// Embeds the recipes and replaces the cache entry, returning the fresh
    /// set so callers can rank against it without re-reading. Empty input is
    /// a no-op returning `Ok(None)`.
    pub fn store(&self, recipes: &[Recipe]) -> Result<Option<CachedSet>, EmbeddingError> {
        if recipes.is_empty() {
            return Ok(None);
        }

        let texts: Vec<String> = recipes
            .iter()
            .map(|recipe| format!("{} {}", recipe.name, recipe.ingredients.join(" ")))
            .collect();
        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();

        let embeddings = self.embedder.embed_batch(&text_refs)?;

        let set = CachedSet {
            recipes: recipes.to_vec().into(),
            embeddings: embeddings.into(),
            fetched_at: Utc::now(),
        };

        *self.entry.write() = Some(set.clone());
        debug!(count = recipes.len(), "recipe cache replaced");

        Ok(Some(set))
    }

    /// The current entry, if any fetch has succeeded yet.
    pub fn current(&self) -> Option<CachedSet> {
        self.entry.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.read().is_none()
    }
}
