pub mod catalog;
pub mod context;
pub mod engine;
pub mod merge;
pub mod providers;
pub mod ranker;
pub mod suggestions;

pub use catalog::Catalog;
pub use engine::{ResponseSource, TurnInput, TurnOutcome};
pub use providers::SuggestionProvider;
