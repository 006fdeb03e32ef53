//! Embedding-similarity food relevance test.

use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, warn};

use crate::constants::{FOOD_RELEVANCE_THRESHOLD, WORD_MEMO_CAPACITY};
use crate::embedding::{EmbeddingError, TextEmbedder};
use crate::ranking::cosine_similarity;

/// Anchor terms a candidate word is compared against.
const FOOD_ANCHOR_TERMS: &[&str] = &[
    "food",
    "ingredient",
    "vegetable",
    "fruit",
    "meat",
    "spice",
    "herb",
    "grain",
    "dairy",
    "seafood",
    "dish",
    "meal",
];

/// The seam the analyzer depends on, so extraction logic is testable without
/// model files.
pub trait RelevanceCheck: Send + Sync {
    fn is_food_related(&self, word: &str) -> bool;
}

impl<T: RelevanceCheck> RelevanceCheck for Arc<T> {
    fn is_food_related(&self, word: &str) -> bool {
        (**self).is_food_related(word)
    }
}

/// Classifies a word as food-related when its embedding lands close enough to
/// any anchor-term embedding.
///
/// Anchor embeddings are computed once at construction; per-word verdicts are
/// memoized in a bounded cache since the provider's weights never change
/// within a process lifetime.
pub struct FoodRelevanceClassifier {
    embedder: Arc<TextEmbedder>,
    anchors: Vec<Vec<f32>>,
    threshold: f32,
    memo: Cache<String, bool>,
}

impl FoodRelevanceClassifier {
    pub fn new(embedder: Arc<TextEmbedder>) -> Result<Self, EmbeddingError> {
        Self::with_threshold(embedder, FOOD_RELEVANCE_THRESHOLD)
    }

    pub fn with_threshold(
        embedder: Arc<TextEmbedder>,
        threshold: f32,
    ) -> Result<Self, EmbeddingError> {
        let anchors = embedder.embed_batch(FOOD_ANCHOR_TERMS)?;

        Ok(Self {
            embedder,
            anchors,
            threshold,
            memo: Cache::builder().max_capacity(WORD_MEMO_CAPACITY).build(),
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn classify(&self, word: &str) -> bool {
        let embedding = match self.embedder.embed(word) {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(word, error = %e, "embedding failed during relevance check");
                return false;
            }
        };

        let best = self
            .anchors
            .iter()
            .map(|anchor| cosine_similarity(anchor, &embedding))
            .fold(f32::MIN, f32::max);

        debug!(word, best_similarity = best, "food relevance scored");
        best > self.threshold
    }
}

impl RelevanceCheck for FoodRelevanceClassifier {
    fn is_food_related(&self, word: &str) -> bool {
        if let Some(verdict) = self.memo.get(word) {
            return verdict;
        }

        let verdict = self.classify(word);
        self.memo.insert(word.to_string(), verdict);
        verdict
    }
}

/// Fixed-list relevance check for tests.
#[cfg(any(test, feature = "mock"))]
pub struct MockRelevance {
    words: std::collections::HashSet<String>,
}

#[cfg(any(test, feature = "mock"))]
impl MockRelevance {
    pub fn with_words(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

#[cfg(any(test, feature = "mock"))]
impl RelevanceCheck for MockRelevance {
    fn is_food_related(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}
