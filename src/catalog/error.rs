use thiserror::Error;

/// Failures from the external recipe catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The daily call budget is spent; no network request was made.
    #[error("daily catalog quota exceeded")]
    QuotaExceeded,

    /// Transport, HTTP-status, or decode failure from the catalog.
    #[error("catalog request failed: {reason}")]
    SourceError { reason: String },
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::SourceError {
            reason: err.to_string(),
        }
    }
}
