use thiserror::Error;

/// A guardrail check failure, returned as ordinary data so callers can map
/// each kind to a user-facing message or status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("query too short")]
    TooShort,

    #[error("query too long")]
    TooLong,

    #[error("instruction-override pattern detected")]
    InjectionDetected,

    #[error("query must be food or recipe related")]
    OffTopic,

    #[error("rate limit exceeded")]
    RateLimited,
}
