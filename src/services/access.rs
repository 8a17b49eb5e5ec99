//! Access decision evaluator.
//!
//! DESIGN
//! ======
//! One decision function over one remote lookup: fetch the subscription list,
//! short-circuit admins, otherwise take the first active record matching the
//! username. Every lookup failure becomes a `Denied` value; nothing escapes
//! as an error. The evaluator holds no mutable state, so identical inputs
//! against unchanged remote state produce identical results.
//!
//! The admin check deliberately runs only after a successful round trip: a
//! transport outage denies admins like everyone else. That ordering is part
//! of the observed contract, not an accident to optimize away.

use std::sync::Arc;

use serde::Serialize;

use super::subscription::{SubscriptionLookup, SubscriptionRecord};

/// Denial reason when the API answered but no record matches.
pub const NO_ACTIVE_SUBSCRIPTION: &str = "No active subscription found";

/// Role attached to a granted login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Subscriber,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Subscriber => "subscriber",
        }
    }
}

/// Outcome of one login attempt.
///
/// Invariant: `Admin` grants never carry a subscription record (the allow-list
/// bypasses the list entirely); `Subscriber` grants carry exactly the matched
/// record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessResult {
    Granted {
        role: Role,
        #[serde(skip_serializing_if = "Option::is_none")]
        subscription: Option<SubscriptionRecord>,
    },
    Denied {
        reason: String,
    },
}

/// The access decision evaluator. Stateless apart from its configuration;
/// the single side effect is the lookup's network call.
pub struct AccessEvaluator {
    api: Arc<dyn SubscriptionLookup>,
    admin_users: Vec<String>,
}

impl AccessEvaluator {
    #[must_use]
    pub fn new(api: Arc<dyn SubscriptionLookup>, admin_users: Vec<String>) -> Self {
        Self { api, admin_users }
    }

    /// Decide whether `username` gets access, authenticating the subscription
    /// lookup itself with `consumer_secret`.
    pub async fn evaluate(&self, username: &str, consumer_secret: &str) -> AccessResult {
        let records = match self.api.fetch_subscriptions(consumer_secret).await {
            Ok(records) => records,
            Err(err) => return AccessResult::Denied { reason: err.to_string() },
        };

        // Admins bypass the subscription list, but only once the API call
        // itself has succeeded.
        if self.admin_users.iter().any(|admin| admin == username) {
            return AccessResult::Granted { role: Role::Admin, subscription: None };
        }

        // First match in list order wins.
        for record in records {
            if record.grants(username) {
                return AccessResult::Granted { role: Role::Subscriber, subscription: Some(record) };
            }
        }

        AccessResult::Denied { reason: NO_ACTIVE_SUBSCRIPTION.to_owned() }
    }
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;
