use std::sync::Arc;

use crate::core::distance::optional_distance;
use crate::core::error::EngineError;
use crate::models::{CreateProfileRequest, Profile, ProfileCard, UpdateProfileRequest, UserId};
use crate::services::{ProfileStore, StoreError, UserStore};

/// Profile onboarding, owner-side edits and display views
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, users: Arc<dyn UserStore>) -> Self {
        Self { profiles, users }
    }

    pub async fn get(&self, user_id: UserId) -> Result<Profile, EngineError> {
        self.profiles
            .get_by_user_id(user_id)
            .await?
            .ok_or(EngineError::ProfileNotFound(user_id))
    }

    /// Create the first profile of an existing user and complete onboarding.
    ///
    /// A user has at most one profile; a second attempt is `ProfileAlreadyExists`.
    pub async fn create(
        &self,
        user_id: UserId,
        request: &CreateProfileRequest,
    ) -> Result<Profile, EngineError> {
        request.check()?;

        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(EngineError::UserNotFound(user_id));
        }
        if self.profiles.get_by_user_id(user_id).await?.is_some() {
            return Err(EngineError::ProfileAlreadyExists(user_id));
        }

        match self.profiles.create(request.to_new_profile(user_id)).await {
            Ok(profile) => {
                tracing::info!("Profile {} created for user {}", profile.id, user_id);
                Ok(profile)
            }
            // a concurrent create won the insert
            Err(StoreError::UniqueViolation(_)) => Err(EngineError::ProfileAlreadyExists(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate `request` against the stored profile and persist the result
    pub async fn update(
        &self,
        user_id: UserId,
        request: &UpdateProfileRequest,
    ) -> Result<Profile, EngineError> {
        let current = self.get(user_id).await?;
        let updated = request.apply_to(current)?;
        let stored = self.profiles.update(&updated).await?;

        tracing::info!("Profile updated for user {}", user_id);
        Ok(stored)
    }

    /// Display card for `user_id`, with distance only when `viewer_id` has a located profile
    pub async fn view(
        &self,
        user_id: UserId,
        viewer_id: Option<UserId>,
    ) -> Result<ProfileCard, EngineError> {
        let profile = self.get(user_id).await?;
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;

        let viewer_location = match viewer_id {
            Some(viewer_id) => self
                .profiles
                .get_by_user_id(viewer_id)
                .await?
                .and_then(|p| p.location),
            None => None,
        };

        let distance_km = optional_distance(viewer_location, profile.location);
        Ok(ProfileCard::new(profile, user.age(), distance_km))
    }
}
