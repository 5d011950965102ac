use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::{Catalog, SuggestionProvider};
use crate::store::ConversationStore;

/// Shared application state.
///
/// The catalog is immutable after startup; only the conversation store
/// mutates, and each request reads-then-writes its own conversation key.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<RwLock<ConversationStore>>,
    pub provider: Arc<dyn SuggestionProvider>,
}

impl AppState {
    pub fn new(catalog: Catalog, provider: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(RwLock::new(ConversationStore::new())),
            provider,
        }
    }
}
