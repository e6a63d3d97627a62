//! In-memory registry of per-visitor storefront state.
//!
//! Each visitor (identified by the UUID kept in their session) owns one
//! [`StorefrontState`] behind an async mutex. Entries expire after the
//! configured idle window, which is how an abandoned cart disappears. Nothing
//! here outlives the process.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use souq_levant_core::StorefrontState;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One visitor's state, shared between their concurrent requests.
pub type SharedState = Arc<Mutex<StorefrontState>>;

/// Upper bound on tracked visitors; least recently used entries go first.
const MAX_VISITORS: u64 = 100_000;

/// Registry of visitor state keyed by visitor ID.
#[derive(Clone)]
pub struct VisitorRegistry {
    cache: Cache<Uuid, SharedState>,
}

impl VisitorRegistry {
    /// Create a registry whose entries expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_VISITORS)
            .time_to_idle(idle)
            .build();

        Self { cache }
    }

    /// Get the state for `visitor`, creating a fresh one on first sight.
    pub async fn get_or_create(&self, visitor: Uuid) -> SharedState {
        self.cache
            .get_with(visitor, async {
                tracing::debug!(%visitor, "New visitor state");
                Arc::new(Mutex::new(StorefrontState::new()))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use souq_levant_core::{Price, Product, ProductId};

    use super::*;

    #[tokio::test]
    async fn test_same_visitor_shares_state() {
        let registry = VisitorRegistry::new(Duration::from_secs(60));
        let visitor = Uuid::new_v4();

        let first = registry.get_or_create(visitor).await;
        first.lock().await.add_to_cart(&Product {
            id: ProductId::new(1),
            title: "Zaatar".to_string(),
            description: String::new(),
            price: Price::new(1000),
            image_url: None,
        });

        let second = registry.get_or_create(visitor).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_visitors_are_isolated() {
        let registry = VisitorRegistry::new(Duration::from_secs(60));

        let a = registry.get_or_create(Uuid::new_v4()).await;
        let b = registry.get_or_create(Uuid::new_v4()).await;
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
