use super::*;
use std::sync::Arc;

use crate::analyzer::MockRelevance;
use crate::catalog::MockRecipeSource;
use crate::catalog::mock::sample_recipe;
use crate::embedding::{EmbedderConfig, TextEmbedder};
use crate::guardrail::RateLimiter;
use crate::llm::LlmBackend;

fn orchestrator() -> RetrievalOrchestrator<MockRecipeSource, MockRelevance> {
    let embedder = Arc::new(TextEmbedder::load(EmbedderConfig::stub()).unwrap());

    RetrievalOrchestrator::new(
        GuardrailValidator::new(RateLimiter::request_level()),
        QueryAnalyzer::new(MockRelevance::with_words(&[
            "pasta", "peanuts", "chicken", "rice",
        ])),
        QueryUnderstanding::new(
            LlmBackend::Disabled,
            GuardrailValidator::new(RateLimiter::llm_level()),
        ),
        MockRecipeSource::new(),
        RecipeCache::new(Arc::clone(&embedder)),
        SemanticRanker::new(embedder),
    )
}

fn source(orch: &RetrievalOrchestrator<MockRecipeSource, MockRelevance>) -> &MockRecipeSource {
    &orch.source
}

#[tokio::test]
async fn test_guardrail_rejection_skips_the_source() {
    let orch = orchestrator();

    let outcome = orch.retrieve("a", "caller", 3).await;
    assert!(matches!(
        outcome,
        RetrievalOutcome::Rejected(Violation::TooShort)
    ));
    assert_eq!(source(&orch).call_count(), 0);
}

#[tokio::test]
async fn test_fresh_fetch_is_cached_and_ranked() {
    let orch = orchestrator();
    source(&orch).push_response(Ok(vec![
        sample_recipe("pasta carbonara", &["spaghetti", "egg"]),
        sample_recipe("pasta arrabbiata", &["penne", "chili"]),
    ]));

    let outcome = orch.retrieve("show me a pasta recipe", "caller", 3).await;

    let RetrievalOutcome::Ranked(recipes) = outcome else {
        panic!("expected ranked outcome");
    };
    assert_eq!(recipes.len(), 2);

    // The mock saw the derived search string, not the raw query.
    assert_eq!(source(&orch).seen_queries(), vec!["pasta".to_string()]);
}

#[tokio::test]
async fn test_allergic_query_derives_search_and_records_exclusions() {
    let orch = orchestrator();
    source(&orch).push_response(Ok(vec![sample_recipe(
        "pasta primavera",
        &["penne", "zucchini"],
    )]));

    let query = "I'm allergic to peanuts, show me a pasta recipe";
    let analyzed = orch.analyze(query, "caller").await;

    for expected in ["nuts", "peanuts", "almonds", "cashews", "walnuts"] {
        assert!(
            analyzed.exclusions.contains(expected),
            "missing {expected} in {:?}",
            analyzed.exclusions
        );
    }

    let outcome = orch.retrieve(query, "caller", 3).await;
    let RetrievalOutcome::Ranked(recipes) = outcome else {
        panic!("expected ranked outcome");
    };
    assert!(!recipes.is_empty());
    assert!(source(&orch).seen_queries()[0].contains("pasta"));
}

#[tokio::test]
async fn test_quota_exhaustion_bypasses_cache() {
    let orch = orchestrator();

    // Seed the cache with a successful fetch.
    source(&orch).push_response(Ok(vec![sample_recipe("pasta bake", &["pasta"])]));
    let _ = orch.retrieve("pasta tonight", "caller", 3).await;

    // Quota errors must surface even though the cache could have answered.
    source(&orch).push_response(Err(CatalogError::QuotaExceeded));
    let outcome = orch.retrieve("more pasta", "caller", 3).await;
    assert!(matches!(outcome, RetrievalOutcome::QuotaExhausted));
}

#[tokio::test]
async fn test_source_error_falls_back_to_cached_recipes() {
    let orch = orchestrator();

    source(&orch).push_response(Ok(vec![
        sample_recipe("chicken soup", &["chicken", "celery"]),
        sample_recipe("fried rice", &["rice", "egg"]),
    ]));
    let _ = orch.retrieve("chicken and rice", "caller", 3).await;

    source(&orch).push_response(Err(CatalogError::SourceError {
        reason: "connection refused".to_string(),
    }));
    let outcome = orch.retrieve("chicken please", "caller", 3).await;

    let RetrievalOutcome::Ranked(recipes) = outcome else {
        panic!("expected ranked outcome");
    };
    assert_eq!(recipes.len(), 2);
    for recipe in &recipes {
        assert!(
            recipe.name == "chicken soup" || recipe.name == "fried rice",
            "unexpected recipe {}",
            recipe.name
        );
    }
}

#[tokio::test]
async fn test_empty_fetch_with_empty_cache_yields_empty() {
    let orch = orchestrator();
    // Queue is empty, so the mock answers Ok(vec![]).
    let outcome = orch.retrieve("pasta ideas", "caller", 3).await;

    let RetrievalOutcome::Ranked(recipes) = outcome else {
        panic!("expected ranked outcome");
    };
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_result_count_respects_desired_count() {
    let orch = orchestrator();
    source(&orch).push_response(Ok(vec![
        sample_recipe("pasta one", &["a"]),
        sample_recipe("pasta two", &["b"]),
        sample_recipe("pasta three", &["c"]),
        sample_recipe("pasta four", &["d"]),
    ]));

    let outcome = orch.retrieve("pasta night", "caller", 2).await;
    let RetrievalOutcome::Ranked(recipes) = outcome else {
        panic!("expected ranked outcome");
    };
    assert_eq!(recipes.len(), 2);
}

#[tokio::test]
async fn test_rate_limited_after_burst() {
    let orch = orchestrator();
    for _ in 0..5 {
        let _ = orch.retrieve("pasta again", "burst-caller", 3).await;
    }

    let outcome = orch.retrieve("pasta again", "burst-caller", 3).await;
    assert!(matches!(
        outcome,
        RetrievalOutcome::Rejected(Violation::RateLimited)
    ));
}
