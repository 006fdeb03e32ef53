//! External recipe catalog adapter.
//!
//! [`CatalogClient`] talks to a Spoonacular-shaped `complexSearch` endpoint.
//! Each search consumes from the shared [`QuotaTracker`] before any network
//! traffic; an empty result set for a multi-word query triggers one retry per
//! individual keyword, stopping at the first keyword that produces results.
//! Keyword retries run against the quota consume of the first request.

mod error;
pub mod quota;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::CatalogError;
pub use quota::QuotaTracker;
pub use types::Recipe;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockRecipeSource;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{CATALOG_FETCH_MULTIPLIER, DAILY_CATALOG_LIMIT};
use types::{RawRecipe, SearchResponse};

/// Where candidate recipes come from. The orchestrator only sees this seam.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Fetches candidates for the derived search string. `original_query` is
    /// carried for logging parity with the upstream caller.
    async fn search(
        &self,
        original_query: &str,
        derived_query: &str,
        desired_count: usize,
    ) -> Result<Vec<Recipe>, CatalogError>;
}

#[async_trait]
impl<T: RecipeSource + ?Sized> RecipeSource for Arc<T> {
    async fn search(
        &self,
        original_query: &str,
        derived_query: &str,
        desired_count: usize,
    ) -> Result<Vec<Recipe>, CatalogError> {
        (**self)
            .search(original_query, derived_query, desired_count)
            .await
    }
}

/// Production catalog adapter.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    quota: QuotaTracker,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.catalog_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
            api_key: config.catalog_api_key.clone(),
            quota: QuotaTracker::new(DAILY_CATALOG_LIMIT),
        })
    }

    /// The shared quota tracker (exposed for observability).
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    async fn complex_search(
        &self,
        query: &str,
        number: usize,
    ) -> Result<Vec<RawRecipe>, CatalogError> {
        let url = format!("{}/complexSearch", self.base_url);
        let number = number.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("query", query),
                ("number", number.as_str()),
                ("addRecipeInformation", "true"),
                ("fillIngredients", "true"),
                ("instructionsRequired", "true"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }
}

#[async_trait]
impl RecipeSource for CatalogClient {
    async fn search(
        &self,
        original_query: &str,
        derived_query: &str,
        desired_count: usize,
    ) -> Result<Vec<Recipe>, CatalogError> {
        if !self.quota.try_consume() {
            warn!("daily catalog limit reached");
            return Err(CatalogError::QuotaExceeded);
        }

        debug!(
            original = original_query,
            derived = derived_query,
            "searching catalog"
        );

        let number = desired_count * CATALOG_FETCH_MULTIPLIER;
        let mut results = self.complex_search(derived_query, number).await?;

        if results.is_empty() && derived_query.split_whitespace().count() > 1 {
            for keyword in derived_query.split_whitespace() {
                info!(keyword, "retrying catalog search with single keyword");
                results = self.complex_search(keyword, number).await?;
                if !results.is_empty() {
                    break;
                }
            }
        }

        if results.is_empty() {
            info!("no catalog results");
            return Ok(Vec::new());
        }

        info!(count = results.len(), "catalog returned recipes");
        Ok(results.into_iter().map(Recipe::from).collect())
    }
}
