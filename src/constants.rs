//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values from the primary ones here to avoid drift
//! between the validator, the limiters, and their tests.

/// Minimum trimmed query length accepted by the guardrails.
pub const MIN_QUERY_LEN: usize = 2;

/// Maximum trimmed query length accepted by the guardrails.
pub const MAX_QUERY_LEN: usize = 500;

/// Daily budget of external catalog calls.
pub const DAILY_CATALOG_LIMIT: u32 = 150;

/// Request-level sliding window, in seconds.
pub const REQUEST_RATE_WINDOW_SECS: u64 = 5;

/// Max requests per caller inside the request-level window.
pub const REQUEST_RATE_MAX_CALLS: usize = 5;

/// LLM-call sliding window, in seconds.
pub const LLM_RATE_WINDOW_SECS: u64 = 60;

/// Max LLM-assisted calls per caller inside the LLM window.
pub const LLM_RATE_MAX_CALLS: usize = 30;

/// Cosine-similarity threshold above which a word counts as food-related.
pub const FOOD_RELEVANCE_THRESHOLD: f32 = 0.4;

/// Bounded capacity of the per-word relevance memo cache.
pub const WORD_MEMO_CAPACITY: u64 = 4_096;

/// Default number of recipes a caller receives.
pub const DEFAULT_RESULT_COUNT: usize = 3;

/// Default top-k when ranking without an explicit caller count.
pub const DEFAULT_RANK_TOP_K: usize = 4;

/// The catalog is asked for this multiple of the desired count, so the
/// re-ranker has candidates to discard.
pub const CATALOG_FETCH_MULTIPLIER: usize = 2;

/// Default embedding dimension (MiniLM-class sentence encoders).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Default max token count per embedded text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Model id used when the Groq backend is selected.
pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Model id used when the Ollama backend is selected.
pub const OLLAMA_MODEL: &str = "llama3.1:8b";
