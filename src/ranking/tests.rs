use super::*;
use crate::catalog::mock::sample_recipe;
use crate::embedding::EmbedderConfig;

fn ranker_and_embedder() -> (SemanticRanker, Arc<TextEmbedder>) {
    let embedder = Arc::new(TextEmbedder::load(EmbedderConfig::stub()).unwrap());
    (SemanticRanker::new(Arc::clone(&embedder)), embedder)
}

fn embed_all(embedder: &TextEmbedder, texts: &[&str]) -> Vec<Vec<f32>> {
    embedder.embed_batch(texts).unwrap()
}

#[test]
fn test_exact_match_ranks_first() {
    let (ranker, embedder) = ranker_and_embedder();
    let recipes = vec![
        sample_recipe("chocolate cake", &["cocoa"]),
        sample_recipe("chicken curry", &["chicken"]),
    ];
    // The second candidate's embedding is exactly the query embedding.
    let embeddings = embed_all(&embedder, &["chocolate cake", "chicken curry"]);

    let ranked = ranker.rank("chicken curry", &recipes, &embeddings, 2);
    assert_eq!(ranked[0].name, "chicken curry");
}

#[test]
fn test_result_size_is_bounded() {
    let (ranker, embedder) = ranker_and_embedder();
    let recipes: Vec<_> = (0..5)
        .map(|i| sample_recipe(&format!("dish {i}"), &["x"]))
        .collect();
    let texts: Vec<String> = recipes.iter().map(|r| r.name.clone()).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let embeddings = embed_all(&embedder, &text_refs);

    assert_eq!(ranker.rank("dish", &recipes, &embeddings, 3).len(), 3);
    assert_eq!(ranker.rank("dish", &recipes, &embeddings, 10).len(), 5);
    assert_eq!(ranker.rank("dish", &recipes, &embeddings, 0).len(), 0);
}

#[test]
fn test_scores_are_non_increasing() {
    let (ranker, embedder) = ranker_and_embedder();
    let names = ["soup", "stew", "salad", "pie"];
    let recipes: Vec<_> = names.iter().map(|n| sample_recipe(n, &["x"])).collect();
    let embeddings = embed_all(&embedder, &names);

    let query_vec = embedder.embed("stew").unwrap();
    let ranked = ranker.rank("stew", &recipes, &embeddings, 4);

    let ranked_scores: Vec<f32> = ranked
        .iter()
        .map(|recipe| {
            let text_index = names.iter().position(|n| *n == recipe.name).unwrap();
            cosine_similarity(&query_vec, &embeddings[text_index])
        })
        .collect();

    for pair in ranked_scores.windows(2) {
        assert!(pair[0] >= pair[1], "scores out of order: {ranked_scores:?}");
    }
}

#[test]
fn test_equal_scores_keep_earlier_index() {
    let (ranker, _) = ranker_and_embedder();
    let recipes = vec![
        sample_recipe("first twin", &["x"]),
        sample_recipe("second twin", &["x"]),
    ];
    // Identical embeddings force a tie.
    let shared = vec![0.6f32, 0.8, 0.0];
    let embeddings = vec![shared.clone(), shared];

    let ranked = ranker.rank("anything", &recipes, &embeddings, 2);
    assert_eq!(ranked[0].name, "first twin");
    assert_eq!(ranked[1].name, "second twin");
}

#[test]
fn test_empty_inputs_yield_empty_output() {
    let (ranker, embedder) = ranker_and_embedder();
    assert!(ranker.rank("soup", &[], &[], 3).is_empty());

    // Length mismatch between recipes and embeddings.
    let recipes = vec![sample_recipe("soup", &["x"])];
    let embeddings = embed_all(&embedder, &["soup", "stew"]);
    assert!(ranker.rank("soup", &recipes, &embeddings, 3).is_empty());
}

mod cosine {
    use super::cosine_similarity;

    #[test]
    fn test_identical_vectors() {
        let v = vec![0.3f32, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_opposite_vectors() {
        let a = vec![1.0f32, 0.0];
        let b = vec![-1.0f32, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_or_zero_inputs() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
