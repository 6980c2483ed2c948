use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{
    CandidateQuery, Match, NewProfile, NewSwipe, NewUser, Profile, SwipeDecision, User, UserId,
};
use crate::services::store::{
    HealthCheck, MatchStore, ProfileStore, StoreError, SwipeStore, UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    // keyed by profile id so searches come back in id order
    profiles: BTreeMap<i64, Profile>,
    swipes: Vec<SwipeDecision>,
    matches: Vec<Match>,
    next_user_id: i64,
    next_profile_id: i64,
    next_swipe_id: i64,
    next_match_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn require_users(&self, ids: [UserId; 2], detail: &str) -> Result<(), StoreError> {
        match ids.into_iter().find(|id| !self.users.contains_key(id)) {
            Some(missing) => Err(StoreError::ForeignKeyViolation(format!(
                "{}: user {} does not exist",
                detail, missing
            ))),
            None => Ok(()),
        }
    }
}

/// In-process store with the same constraint semantics as the PostgreSQL schema.
///
/// All tables sit behind one lock, so every uniqueness check and insert is atomic.
/// Swipes and matches must reference existing users. Profiles do not, which
/// lets tests build a profile whose user record is gone.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

fn newest_first<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> (chrono::DateTime<Utc>, i64),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn page<T: Clone>(rows: &[T], limit: u32, offset: u32) -> Vec<T> {
    rows.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_user_id);
        let user = User {
            id,
            gender: user.gender,
            birth_date: user.birth_date,
            is_verified: user.is_verified,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.profiles.values().any(|p| p.user_id == profile.user_id) {
            return Err(StoreError::UniqueViolation(format!(
                "profile for user {} already exists",
                profile.user_id
            )));
        }

        let id = Tables::next_id(&mut tables.next_profile_id);
        let now = Utc::now();
        let profile = Profile {
            id,
            user_id: profile.user_id,
            display_name: profile.display_name,
            bio: profile.bio,
            city: profile.city,
            interests: profile.interests,
            location: profile.location,
            pref_min_age: profile.pref_min_age,
            pref_max_age: profile.pref_max_age,
            pref_max_distance_km: profile.pref_max_distance_km,
            is_onboarding_complete: profile.is_onboarding_complete,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.insert(id, profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut tables = self.tables.write().await;
        let stored = tables.profiles.get_mut(&profile.id).ok_or_else(|| {
            StoreError::Inconsistent(format!("profile {} does not exist", profile.id))
        })?;

        *stored = Profile {
            updated_at: Utc::now(),
            ..profile.clone()
        };
        Ok(stored.clone())
    }

    async fn search(
        &self,
        query: &CandidateQuery,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Profile>, StoreError> {
        let tables = self.tables.read().await;
        let matching: Vec<Profile> = tables
            .profiles
            .values()
            .filter(|p| {
                query
                    .is_onboarding_complete
                    .map_or(true, |flag| p.is_onboarding_complete == flag)
            })
            .filter(|p| {
                query
                    .city
                    .as_ref()
                    .map_or(true, |city| p.city.as_ref() == Some(city))
            })
            .cloned()
            .collect();

        Ok(page(&matching, limit, offset))
    }
}

#[async_trait]
impl SwipeStore for MemoryStore {
    async fn create(&self, swipe: NewSwipe) -> Result<SwipeDecision, StoreError> {
        if swipe.actor_id == swipe.target_id {
            return Err(StoreError::Inconsistent("swiper and swiped must differ".into()));
        }

        let mut tables = self.tables.write().await;
        let detail = format!("swipe {} -> {}", swipe.actor_id, swipe.target_id);
        tables.require_users([swipe.actor_id, swipe.target_id], &detail)?;
        if tables
            .swipes
            .iter()
            .any(|s| s.actor_id == swipe.actor_id && s.target_id == swipe.target_id)
        {
            return Err(StoreError::UniqueViolation(format!(
                "swipe {} -> {} already exists",
                swipe.actor_id, swipe.target_id
            )));
        }

        let id = Tables::next_id(&mut tables.next_swipe_id);
        let decision = SwipeDecision {
            id,
            actor_id: swipe.actor_id,
            target_id: swipe.target_id,
            is_like: swipe.is_like,
            created_at: Utc::now(),
        };
        tables.swipes.push(decision.clone());
        Ok(decision)
    }

    async fn get_by_users(
        &self,
        actor_id: UserId,
        target_id: UserId,
    ) -> Result<Option<SwipeDecision>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .swipes
            .iter()
            .find(|s| s.actor_id == actor_id && s.target_id == target_id)
            .cloned())
    }

    async fn count_mutual_likes(&self, user_a: UserId, user_b: UserId) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        let count = tables
            .swipes
            .iter()
            .filter(|s| s.is_like)
            .filter(|s| {
                (s.actor_id == user_a && s.target_id == user_b)
                    || (s.actor_id == user_b && s.target_id == user_a)
            })
            .count();
        Ok(count as u64)
    }

    async fn likes_received(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, StoreError> {
        let tables = self.tables.read().await;
        let mut likes: Vec<SwipeDecision> = tables
            .swipes
            .iter()
            .filter(|s| s.target_id == user_id && s.is_like)
            .cloned()
            .collect();
        newest_first(&mut likes, |s| (s.created_at, s.id));
        Ok(page(&likes, limit, offset))
    }

    async fn count_likes_received(&self, user_id: UserId) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        let count = tables
            .swipes
            .iter()
            .filter(|s| s.target_id == user_id && s.is_like)
            .count();
        Ok(count as u64)
    }

    async fn list_by_actor(
        &self,
        actor_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, StoreError> {
        let tables = self.tables.read().await;
        let mut decisions: Vec<SwipeDecision> = tables
            .swipes
            .iter()
            .filter(|s| s.actor_id == actor_id)
            .cloned()
            .collect();
        newest_first(&mut decisions, |s| (s.created_at, s.id));
        Ok(page(&decisions, limit, offset))
    }

    async fn delete_dislikes(&self, actor_id: UserId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.swipes.len();
        tables
            .swipes
            .retain(|s| !(s.actor_id == actor_id && !s.is_like));
        Ok((before - tables.swipes.len()) as u64)
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn get_by_pair(
        &self,
        user1_id: UserId,
        user2_id: UserId,
    ) -> Result<Option<Match>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .matches
            .iter()
            .find(|m| m.user1_id == user1_id && m.user2_id == user2_id)
            .cloned())
    }

    async fn create(&self, user1_id: UserId, user2_id: UserId) -> Result<Match, StoreError> {
        if user1_id >= user2_id {
            return Err(StoreError::Inconsistent(format!(
                "match pair ({}, {}) is not canonical",
                user1_id, user2_id
            )));
        }

        let mut tables = self.tables.write().await;
        let detail = format!("match ({}, {})", user1_id, user2_id);
        tables.require_users([user1_id, user2_id], &detail)?;
        if tables
            .matches
            .iter()
            .any(|m| m.user1_id == user1_id && m.user2_id == user2_id)
        {
            return Err(StoreError::UniqueViolation(format!(
                "match ({}, {}) already exists",
                user1_id, user2_id
            )));
        }

        let id = Tables::next_id(&mut tables.next_match_id);
        let created = Match {
            id,
            user1_id,
            user2_id,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.matches.push(created.clone());
        Ok(created)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Match>, StoreError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Match> = tables
            .matches
            .iter()
            .filter(|m| m.user1_id == user_id || m.user2_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut matches, |m| (m.created_at, m.id));
        Ok(page(&matches, limit, offset))
    }
}
