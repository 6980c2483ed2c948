use thiserror::Error;
use validator::ValidationErrors;

use crate::models::UserId;
use crate::services::StoreError;

/// Failures surfaced by engine operations.
///
/// An exhausted feed is not an error; it is `Ok(None)` from the feed selector.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot swipe yourself")]
    SelfSwipe,

    #[error("swipe already exists: {actor_id} -> {target_id}")]
    DuplicateSwipe { actor_id: UserId, target_id: UserId },

    #[error("profile not found for user {0}")]
    ProfileNotFound(UserId),

    #[error("profile already exists for user {0}")]
    ProfileAlreadyExists(UserId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
