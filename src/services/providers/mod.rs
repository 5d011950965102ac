use crate::error::AppResult;

pub mod http_ai;

pub use http_ai::HttpAiProvider;

/// Seam to the external AI suggestion source.
///
/// The engine treats the source as an unreliable oracle: one attempt per
/// turn, any failure or timeout surfaces as `AppError::AiUnavailable` and
/// the caller falls back to the heuristic path. Implementations must not
/// retry internally.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Requests free-form suggestion text for the given prompt.
    async fn suggest(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
