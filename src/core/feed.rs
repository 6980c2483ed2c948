use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::core::distance::optional_distance;
use crate::core::error::EngineError;
use crate::core::filters::is_eligible;
use crate::core::ledger::SwipeLedger;
use crate::models::{CandidateQuery, ProfileCard, UserId};
use crate::services::{ProfileStore, UserStore};

/// Default number of profiles fetched per feed request
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Picks the next profile to show a viewer.
///
/// # Pipeline
/// 1. Coarse store query: onboarding complete, same city when the viewer has one
/// 2. Skip self and anyone the viewer already decided on
/// 3. Full eligibility check (age, gender, distance)
///
/// Only one bounded batch is scanned per call. Eligible profiles beyond the
/// batch surface on later calls, once earlier ones have been swiped or reset.
#[derive(Clone)]
pub struct FeedSelector {
    profiles: Arc<dyn ProfileStore>,
    users: Arc<dyn UserStore>,
    ledger: SwipeLedger,
    batch_size: u32,
}

impl FeedSelector {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        users: Arc<dyn UserStore>,
        ledger: SwipeLedger,
        batch_size: u32,
    ) -> Self {
        Self {
            profiles,
            users,
            ledger,
            batch_size: batch_size.max(1),
        }
    }

    /// Next candidate for `viewer_id`, or `None` when the feed is exhausted
    pub async fn next_candidate(&self, viewer_id: UserId) -> Result<Option<ProfileCard>, EngineError> {
        self.next_candidate_on(viewer_id, Utc::now().date_naive()).await
    }

    /// Same as [`next_candidate`](Self::next_candidate) with ages taken on `today`
    pub async fn next_candidate_on(
        &self,
        viewer_id: UserId,
        today: NaiveDate,
    ) -> Result<Option<ProfileCard>, EngineError> {
        let viewer_profile = self
            .profiles
            .get_by_user_id(viewer_id)
            .await?
            .ok_or(EngineError::ProfileNotFound(viewer_id))?;
        let viewer = self
            .users
            .get_by_id(viewer_id)
            .await?
            .ok_or(EngineError::UserNotFound(viewer_id))?;

        let query = CandidateQuery {
            is_onboarding_complete: Some(true),
            city: viewer_profile.city_filter().map(str::to_string),
        };
        let batch = self.profiles.search(&query, self.batch_size, 0).await?;

        tracing::debug!("Scanning {} candidates for user {}", batch.len(), viewer_id);

        for candidate_profile in batch {
            let candidate_id = candidate_profile.user_id;
            if candidate_id == viewer_id {
                continue;
            }

            if self.ledger.has_decision(viewer_id, candidate_id).await? {
                continue;
            }

            let Some(candidate) = self.users.get_by_id(candidate_id).await? else {
                tracing::debug!("Skipping candidate {}: user record missing", candidate_id);
                continue;
            };

            if !is_eligible(&viewer, &viewer_profile, &candidate, &candidate_profile, today) {
                continue;
            }

            let distance_km = optional_distance(viewer_profile.location, candidate_profile.location);
            let age = candidate.age_on(today);

            tracing::debug!("Next candidate for user {} is {}", viewer_id, candidate_id);
            return Ok(Some(ProfileCard::new(candidate_profile, age, distance_km)));
        }

        tracing::debug!("Feed exhausted for user {}", viewer_id);
        Ok(None)
    }
}

/// Clears a user's dislikes so previously rejected profiles come back into the feed.
///
/// Likes and matches are untouched.
#[derive(Clone)]
pub struct FeedResetter {
    ledger: SwipeLedger,
}

impl FeedResetter {
    pub fn new(ledger: SwipeLedger) -> Self {
        Self { ledger }
    }

    pub async fn reset_feed(&self, user_id: UserId) -> Result<u64, EngineError> {
        let removed = self.ledger.reset_negative_decisions(user_id).await?;
        tracing::info!("Reset {} dislikes for user {}", removed, user_id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GeoPoint, NewProfile, NewUser};
    use crate::services::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        feed: FeedSelector,
        ledger: SwipeLedger,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn fixture(batch_size: u32) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let ledger = SwipeLedger::new(store.clone());
        let feed = FeedSelector::new(store.clone(), store.clone(), ledger.clone(), batch_size);
        Fixture { store, feed, ledger }
    }

    async fn add_user(
        store: &MemoryStore,
        gender: Gender,
        age: i32,
        city: &str,
        location: Option<GeoPoint>,
    ) -> UserId {
        let user = UserStore::create(
            store,
            NewUser {
                gender,
                birth_date: NaiveDate::from_ymd_opt(2025 - age, 1, 1).unwrap(),
                is_verified: false,
            },
        )
        .await
        .unwrap();

        ProfileStore::create(
            store,
            NewProfile {
                user_id: user.id,
                display_name: Some(format!("User {}", user.id)),
                city: Some(city.to_string()),
                location,
                pref_min_age: Some(20),
                pref_max_age: Some(30),
                pref_max_distance_km: Some(50),
                is_onboarding_complete: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        user.id
    }

    #[tokio::test]
    async fn test_missing_viewer_profile() {
        let f = fixture(100);
        assert!(matches!(
            f.feed.next_candidate_on(42, today()).await,
            Err(EngineError::ProfileNotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_first_eligible_candidate_returned() {
        let f = fixture(100);
        let viewer = add_user(&f.store, Gender::Male, 27, "Moscow", Some(GeoPoint::new(55.75, 37.62))).await;
        let _same_gender = add_user(&f.store, Gender::Male, 25, "Moscow", None).await;
        let candidate = add_user(&f.store, Gender::Female, 25, "Moscow", Some(GeoPoint::new(55.80, 37.70))).await;

        let card = f.feed.next_candidate_on(viewer, today()).await.unwrap().unwrap();
        assert_eq!(card.user_id, candidate);
        assert_eq!(card.age, 25);
        let distance = card.distance_km.unwrap();
        assert!(distance > 0.0 && distance < 50.0);
    }

    #[tokio::test]
    async fn test_swiped_candidates_skipped_until_exhausted() {
        let f = fixture(100);
        let viewer = add_user(&f.store, Gender::Male, 27, "Moscow", None).await;
        let first = add_user(&f.store, Gender::Female, 24, "Moscow", None).await;
        let second = add_user(&f.store, Gender::Female, 26, "Moscow", None).await;

        f.ledger.record_decision(viewer, first, false).await.unwrap();
        let card = f.feed.next_candidate_on(viewer, today()).await.unwrap().unwrap();
        assert_eq!(card.user_id, second);
        assert!(card.distance_km.is_none());

        f.ledger.record_decision(viewer, second, true).await.unwrap();
        assert!(f.feed.next_candidate_on(viewer, today()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_city_not_shown() {
        let f = fixture(100);
        let viewer = add_user(&f.store, Gender::Female, 27, "Moscow", None).await;
        add_user(&f.store, Gender::Male, 25, "Kazan", None).await;

        assert!(f.feed.next_candidate_on(viewer, today()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_only_one_batch_is_scanned() {
        let f = fixture(2);
        let viewer = add_user(&f.store, Gender::Male, 27, "Moscow", None).await;
        // batch of two holds the viewer and an ineligible profile
        add_user(&f.store, Gender::Male, 25, "Moscow", None).await;
        add_user(&f.store, Gender::Female, 25, "Moscow", None).await;

        assert!(f.feed.next_candidate_on(viewer, today()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_candidate_without_user_record_skipped() {
        let f = fixture(100);
        let viewer = add_user(&f.store, Gender::Male, 27, "Moscow", None).await;
        ProfileStore::create(
            f.store.as_ref(),
            NewProfile {
                user_id: 999,
                city: Some("Moscow".to_string()),
                is_onboarding_complete: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let candidate = add_user(&f.store, Gender::Female, 22, "Moscow", None).await;

        let card = f.feed.next_candidate_on(viewer, today()).await.unwrap().unwrap();
        assert_eq!(card.user_id, candidate);
    }

    #[tokio::test]
    async fn test_reset_brings_disliked_back() {
        let f = fixture(100);
        let viewer = add_user(&f.store, Gender::Male, 27, "Moscow", None).await;
        let candidate = add_user(&f.store, Gender::Female, 25, "Moscow", None).await;
        f.ledger.record_decision(viewer, candidate, false).await.unwrap();
        assert!(f.feed.next_candidate_on(viewer, today()).await.unwrap().is_none());

        let resetter = FeedResetter::new(f.ledger.clone());
        assert_eq!(resetter.reset_feed(viewer).await.unwrap(), 1);

        let card = f.feed.next_candidate_on(viewer, today()).await.unwrap().unwrap();
        assert_eq!(card.user_id, candidate);
        assert_eq!(resetter.reset_feed(viewer).await.unwrap(), 0);
    }
}
