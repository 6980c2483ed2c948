//! Narrow persistence interfaces consumed by the engine.
//!
//! The backing store is the single source of truth and the serialization
//! point for concurrent requests: uniqueness of `(actor, target)` decisions
//! and of canonical match pairs is enforced here, not in the engine.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CandidateQuery, Match, NewProfile, NewSwipe, NewUser, Profile, SwipeDecision, User, UserId,
};

/// Errors raised by a backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Inconsistent store state: {0}")]
    Inconsistent(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Profile>, StoreError>;

    /// Fails with `UniqueViolation` if the user already has a profile
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError>;

    async fn update(&self, profile: &Profile) -> Result<Profile, StoreError>;

    /// Profiles matching `query`, ordered by ascending profile id
    async fn search(
        &self,
        query: &CandidateQuery,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Profile>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

#[async_trait]
pub trait SwipeStore: Send + Sync {
    /// Fails with `UniqueViolation` if a decision for the ordered pair exists
    /// and with `ForeignKeyViolation` if either user is unknown
    async fn create(&self, swipe: NewSwipe) -> Result<SwipeDecision, StoreError>;

    async fn get_by_users(
        &self,
        actor_id: UserId,
        target_id: UserId,
    ) -> Result<Option<SwipeDecision>, StoreError>;

    /// Number of like rows covering either direction of the pair
    async fn count_mutual_likes(&self, user_a: UserId, user_b: UserId) -> Result<u64, StoreError>;

    /// Likes targeting `user_id`, newest first
    async fn likes_received(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, StoreError>;

    async fn count_likes_received(&self, user_id: UserId) -> Result<u64, StoreError>;

    /// Decisions made by `actor_id`, newest first
    async fn list_by_actor(
        &self,
        actor_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, StoreError>;

    /// Delete every dislike made by `actor_id`, returning the number removed
    async fn delete_dislikes(&self, actor_id: UserId) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Lookup by canonical pair (`user1_id < user2_id`)
    async fn get_by_pair(
        &self,
        user1_id: UserId,
        user2_id: UserId,
    ) -> Result<Option<Match>, StoreError>;

    /// Insert an active match for a canonical pair.
    ///
    /// Fails with `UniqueViolation` if the pair already has one and with
    /// `ForeignKeyViolation` if either user is unknown.
    async fn create(&self, user1_id: UserId, user2_id: UserId) -> Result<Match, StoreError>;

    /// Matches involving `user_id`, newest first
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Match>, StoreError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// `Ok(true)` when the store answers a trivial query
    async fn health_check(&self) -> Result<bool, StoreError>;
}
