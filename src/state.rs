//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the access evaluator and the in-memory session store. Clone is
//! required by Axum — all inner fields are Arc-wrapped or Clone.

use std::sync::Arc;

use crate::services::access::AccessEvaluator;
use crate::services::session::SessionStore;
use crate::services::subscription::SubscriptionLookup;

#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<AccessEvaluator>,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(api: Arc<dyn SubscriptionLookup>, admin_users: Vec<String>) -> Self {
        Self { evaluator: Arc::new(AccessEvaluator::new(api, admin_users)), sessions: SessionStore::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
