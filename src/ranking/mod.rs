//! Semantic re-ranking of candidate recipes.

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::Recipe;
use crate::embedding::TextEmbedder;

pub use crate::constants::DEFAULT_RANK_TOP_K;

/// Orders candidates by cosine similarity between the query embedding and
/// each recipe embedding.
pub struct SemanticRanker {
    embedder: Arc<TextEmbedder>,
}

impl SemanticRanker {
    pub fn new(embedder: Arc<TextEmbedder>) -> Self {
        Self { embedder }
    }

    /// Returns at most `min(top_k, recipes.len())` recipes in non-increasing
    /// similarity order. Ties are stable: the earlier index wins.
    ///
    /// Empty input, a recipe/embedding length mismatch, or a failed query
    /// embedding all yield an empty result rather than an error.
    pub fn rank(
        &self,
        query: &str,
        recipes: &[Recipe],
        embeddings: &[Vec<f32>],
        top_k: usize,
    ) -> Vec<Recipe> {
        if recipes.is_empty() || embeddings.len() != recipes.len() {
            return Vec::new();
        }

        let query_embedding = match self.embedder.embed(query) {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, returning no ranked results");
                return Vec::new();
            }
        };

        let mut scored: Vec<(usize, f32)> = embeddings
            .iter()
            .enumerate()
            .map(|(index, embedding)| (index, cosine_similarity(&query_embedding, embedding)))
            .collect();

        // Stable sort keeps the earlier index first on equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k.min(recipes.len()));

        debug!(
            candidates = recipes.len(),
            returned = scored.len(),
            top_score = scored.first().map(|(_, s)| *s),
            "ranked recipes"
        );

        scored
            .into_iter()
            .map(|(index, _)| recipes[index].clone())
            .collect()
    }
}

/// Cosine similarity of two vectors; 0.0 on length mismatch, emptiness, or a
/// zero-norm side.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (av, bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
