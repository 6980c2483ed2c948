use std::sync::Arc;

use crate::core::error::EngineError;
use crate::models::{Match, UserId};
use crate::services::{MatchStore, StoreError};

/// Order a pair so the smaller id comes first
#[inline]
pub fn canonical_pair(user_a: UserId, user_b: UserId) -> (UserId, UserId) {
    if user_a <= user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    }
}

/// Materializes the single Match record for a mutually-liked pair
#[derive(Clone)]
pub struct MatchResolver {
    store: Arc<dyn MatchStore>,
}

impl MatchResolver {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Return the pair's Match, creating it if absent.
    ///
    /// Idempotent and order-insensitive. When a concurrent call inserts first,
    /// the store's unique constraint rejects ours and the winner's row is returned.
    pub async fn resolve(&self, user_a: UserId, user_b: UserId) -> Result<Match, EngineError> {
        let (user1_id, user2_id) = canonical_pair(user_a, user_b);

        if let Some(existing) = self.store.get_by_pair(user1_id, user2_id).await? {
            return Ok(existing);
        }

        match self.store.create(user1_id, user2_id).await {
            Ok(created) => {
                tracing::info!("Match created between {} and {}", user1_id, user2_id);
                Ok(created)
            }
            Err(StoreError::UniqueViolation(_)) => {
                tracing::debug!("Match ({}, {}) created concurrently", user1_id, user2_id);
                self.store
                    .get_by_pair(user1_id, user2_id)
                    .await?
                    .ok_or_else(|| {
                        StoreError::Inconsistent(format!(
                            "match ({}, {}) conflicted but cannot be read back",
                            user1_id, user2_id
                        ))
                        .into()
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Matches involving `user_id`, newest first
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Match>, EngineError> {
        Ok(self.store.list_for_user(user_id, limit, offset).await?)
    }
}
