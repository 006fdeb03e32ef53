//! HTTP surface: `POST /search` plus health probing.
//!
//! This layer only translates between the orchestrator's outcome data and
//! the JSON envelope / status codes the web client expects. All retrieval
//! semantics live below it.

mod error;


pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::analyzer::RelevanceCheck;
use crate::catalog::{Recipe, RecipeSource};
use crate::constants::DEFAULT_RESULT_COUNT;
use crate::retrieval::{RetrievalOrchestrator, RetrievalOutcome};

/// Shared handler state; cloning is an `Arc` bump.
pub struct AppState<S: RecipeSource, C: RelevanceCheck> {
    pub orchestrator: Arc<RetrievalOrchestrator<S, C>>,
}

impl<S: RecipeSource, C: RelevanceCheck> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}

impl<S: RecipeSource, C: RelevanceCheck> AppState<S, C> {
    pub fn new(orchestrator: Arc<RetrievalOrchestrator<S, C>>) -> Self {
        Self { orchestrator }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    pub rate_limited: bool,
    pub results: Vec<RecipeView>,
}

/// One recipe as the web client renders it: ingredients joined into a single
/// display string, field names in the wire casing the client expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub name: String,
    pub ingredients: String,
    pub steps: Vec<String>,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub source_url: String,
}

impl From<Recipe> for RecipeView {
    fn from(recipe: Recipe) -> Self {
        Self {
            name: recipe.name,
            ingredients: recipe.ingredients.join(", "),
            steps: recipe.steps,
            ready_in_minutes: recipe.ready_in_minutes,
            servings: recipe.servings,
            source_url: recipe.source_url,
        }
    }
}

/// Builds the router with tracing and permissive CORS.
pub fn create_router<S, C>(state: AppState<S, C>) -> Router
where
    S: RecipeSource + 'static,
    C: RelevanceCheck + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/search", post(search_handler::<S, C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn search_handler<S, C>(
    State(state): State<AppState<S, C>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponseBody>, ApiError>
where
    S: RecipeSource + 'static,
    C: RelevanceCheck + 'static,
{
    let caller_id = addr.ip().to_string();
    let count = request.count.unwrap_or(DEFAULT_RESULT_COUNT);

    let outcome = state
        .orchestrator
        .retrieve(&request.query, &caller_id, count)
        .await;

    match outcome {
        RetrievalOutcome::Ranked(recipes) => {
            info!(caller = %caller_id, results = recipes.len(), "search served");
            Ok(Json(SearchResponseBody {
                rate_limited: false,
                results: recipes.into_iter().map(RecipeView::from).collect(),
            }))
        }
        RetrievalOutcome::Rejected(violation) => Err(ApiError::from(violation)),
        RetrievalOutcome::QuotaExhausted => Err(ApiError::QuotaExhausted),
    }
}
