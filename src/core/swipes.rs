use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::distance::optional_distance;
use crate::core::error::EngineError;
use crate::core::ledger::SwipeLedger;
use crate::core::resolver::MatchResolver;
use crate::models::{
    LikeReceived, LikesReceivedResponse, Match, Profile, ProfileCard, SwipeDecision, UserId,
};
use crate::services::{ProfileStore, StoreError, UserStore};

/// Result of a swipe.
///
/// `matched_user` is best-effort enrichment and may be absent even when `is_match` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    pub is_match: bool,
    pub swipe: SwipeDecision,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_user: Option<ProfileCard>,
}

/// User-facing operations around swipes: recording them, detecting matches
/// and building the profile cards shown alongside.
#[derive(Clone)]
pub struct SwipeService {
    profiles: Arc<dyn ProfileStore>,
    users: Arc<dyn UserStore>,
    ledger: SwipeLedger,
    resolver: MatchResolver,
}

impl SwipeService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        users: Arc<dyn UserStore>,
        ledger: SwipeLedger,
        resolver: MatchResolver,
    ) -> Self {
        Self {
            profiles,
            users,
            ledger,
            resolver,
        }
    }

    /// Record a like or dislike, materializing a match on the second mutual like
    pub async fn swipe(
        &self,
        actor_id: UserId,
        target_id: UserId,
        is_like: bool,
    ) -> Result<SwipeOutcome, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::SelfSwipe);
        }
        for user_id in [actor_id, target_id] {
            if self.users.get_by_id(user_id).await?.is_none() {
                return Err(EngineError::UserNotFound(user_id));
            }
        }

        let swipe = self.ledger.record_decision(actor_id, target_id, is_like).await?;

        let mut outcome = SwipeOutcome {
            is_match: false,
            swipe,
            matched: None,
            matched_user: None,
        };

        if !is_like || !self.ledger.check_mutual_like(actor_id, target_id).await? {
            return Ok(outcome);
        }

        let matched = self.resolver.resolve(actor_id, target_id).await?;
        outcome.is_match = true;
        outcome.matched = Some(matched);

        match self.profile_card(actor_id, target_id).await {
            Ok(card) => outcome.matched_user = card,
            Err(e) => {
                tracing::warn!(
                    "Match {} <-> {} stands but matched profile could not be loaded: {}",
                    actor_id,
                    target_id,
                    e
                );
            }
        }

        Ok(outcome)
    }

    /// Users who liked `user_id`, newest first, with their profile cards.
    ///
    /// Likers whose profile or user record is gone are left out of the page.
    pub async fn likes_received(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<LikesReceivedResponse, EngineError> {
        let likes = self.ledger.list_likes_received(user_id, limit, offset).await?;
        let total = self.ledger.count_likes_received(user_id).await?;
        let viewer_profile = self.profiles.get_by_user_id(user_id).await?;

        let mut entries = Vec::with_capacity(likes.len());
        for like in likes {
            let Some(card) = self.card_for(viewer_profile.as_ref(), like.actor_id).await? else {
                tracing::debug!("Skipping like {}: liker {} has no profile", like.id, like.actor_id);
                continue;
            };
            entries.push(LikeReceived {
                swipe_id: like.id,
                user: card,
                created_at: like.created_at,
            });
        }

        Ok(LikesReceivedResponse { likes: entries, total })
    }

    /// Decisions `user_id` has made, newest first
    pub async fn decisions(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, EngineError> {
        self.ledger.list_decisions(user_id, limit, offset).await
    }

    /// Matches `user_id` takes part in, newest first
    pub async fn matches(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Match>, EngineError> {
        self.resolver.list_for_user(user_id, limit, offset).await
    }

    /// Card for `subject_id` as seen by `viewer_id`
    async fn profile_card(
        &self,
        viewer_id: UserId,
        subject_id: UserId,
    ) -> Result<Option<ProfileCard>, StoreError> {
        let viewer_profile = self.profiles.get_by_user_id(viewer_id).await?;
        self.card_for(viewer_profile.as_ref(), subject_id).await
    }

    async fn card_for(
        &self,
        viewer_profile: Option<&Profile>,
        subject_id: UserId,
    ) -> Result<Option<ProfileCard>, StoreError> {
        let Some(profile) = self.profiles.get_by_user_id(subject_id).await? else {
            return Ok(None);
        };
        let Some(user) = self.users.get_by_id(subject_id).await? else {
            return Ok(None);
        };

        let distance_km = optional_distance(viewer_profile.and_then(|p| p.location), profile.location);
        let age = user.age_on(Utc::now().date_naive());
        Ok(Some(ProfileCard::new(profile, age, distance_km)))
    }
}
