use std::sync::Arc;

use crate::core::error::EngineError;
use crate::models::{NewSwipe, SwipeDecision, UserId};
use crate::services::{StoreError, SwipeStore};

/// Records directional like/dislike decisions and answers questions about them.
///
/// The first decision for an ordered pair sticks; later ones are rejected.
#[derive(Clone)]
pub struct SwipeLedger {
    store: Arc<dyn SwipeStore>,
}

impl SwipeLedger {
    pub fn new(store: Arc<dyn SwipeStore>) -> Self {
        Self { store }
    }

    /// Persist a decision of `actor_id` about `target_id`
    pub async fn record_decision(
        &self,
        actor_id: UserId,
        target_id: UserId,
        is_like: bool,
    ) -> Result<SwipeDecision, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::SelfSwipe);
        }

        if self.has_decision(actor_id, target_id).await? {
            return Err(EngineError::DuplicateSwipe { actor_id, target_id });
        }

        // a concurrent request can still win between the check and the insert
        let swipe = NewSwipe { actor_id, target_id, is_like };
        let decision = match self.store.create(swipe).await {
            Ok(decision) => decision,
            Err(StoreError::UniqueViolation(_)) => {
                return Err(EngineError::DuplicateSwipe { actor_id, target_id })
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Recorded {} {} -> {}",
            if is_like { "like" } else { "dislike" },
            actor_id,
            target_id
        );

        Ok(decision)
    }

    /// Whether `user_a` has decided on `user_b` (this direction only)
    pub async fn has_decision(&self, user_a: UserId, user_b: UserId) -> Result<bool, EngineError> {
        Ok(self.store.get_by_users(user_a, user_b).await?.is_some())
    }

    /// True only when exactly the two like rows A→B and B→A exist
    pub async fn check_mutual_like(&self, user_a: UserId, user_b: UserId) -> Result<bool, EngineError> {
        if user_a == user_b {
            return Ok(false);
        }
        let likes = self.store.count_mutual_likes(user_a, user_b).await?;
        Ok(likes == 2)
    }

    /// Likes targeting `user_id`, newest first
    pub async fn list_likes_received(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, EngineError> {
        Ok(self.store.likes_received(user_id, limit, offset).await?)
    }

    pub async fn count_likes_received(&self, user_id: UserId) -> Result<u64, EngineError> {
        Ok(self.store.count_likes_received(user_id).await?)
    }

    /// Decisions made by `actor_id`, newest first
    pub async fn list_decisions(
        &self,
        actor_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, EngineError> {
        Ok(self.store.list_by_actor(actor_id, limit, offset).await?)
    }

    /// Delete every dislike made by `user_id` and return how many were removed
    pub async fn reset_negative_decisions(&self, user_id: UserId) -> Result<u64, EngineError> {
        Ok(self.store.delete_dislikes(user_id).await?)
    }
}
