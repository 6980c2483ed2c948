use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;

use crate::models::{
    CandidateQuery, GeoPoint, Match, NewProfile, NewSwipe, NewUser, Profile, SwipeDecision, User,
    UserId,
};
use crate::services::store::{
    HealthCheck, MatchStore, ProfileStore, StoreError, SwipeStore, UserStore,
};

const PROFILE_COLUMNS: &str = "id, user_id, display_name, bio, city, interests, location_lat, \
     location_lon, pref_min_age, pref_max_age, pref_max_distance_km, is_onboarding_complete, \
     created_at, updated_at";

const SWIPE_COLUMNS: &str = "id, swiper_id, swiped_id, is_like, created_at";

const MATCH_COLUMNS: &str = "id, user1_id, user2_id, is_active, created_at";

/// PostgreSQL implementation of every store the engine consumes.
///
/// The schema in `migrations/` carries the uniqueness constraints on
/// `(swiper_id, swiped_id)` and the canonical `(user1_id, user2_id)` pair,
/// which is what makes concurrent swipes and match resolution safe.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from optional settings values
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl HealthCheck for PostgresStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Translate typed candidate criteria into a profile search statement
pub fn candidate_search_sql(
    query: &CandidateQuery,
    limit: u32,
    offset: u32,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM profiles WHERE TRUE", PROFILE_COLUMNS));

    if let Some(complete) = query.is_onboarding_complete {
        builder.push(" AND is_onboarding_complete = ").push_bind(complete);
    }
    if let Some(city) = &query.city {
        builder.push(" AND city = ").push_bind(city.clone());
    }

    builder
        .push(" ORDER BY id LIMIT ")
        .push_bind(i64::from(limit))
        .push(" OFFSET ")
        .push_bind(i64::from(offset));

    builder
}

/// Surface constraint violations as their own variants, `detail` names the conflicting row
fn constraint_error(err: sqlx::Error, detail: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation(detail),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::ForeignKeyViolation(format!("{}: {}", detail, db.message()))
        }
        _ => StoreError::Sqlx(err),
    }
}

/// Narrow an INTEGER column into its domain type; out-of-range values are an error, not `None`
fn small_int<T: TryFrom<i32>>(column: &str, value: Option<i32>) -> Result<Option<T>, StoreError> {
    value
        .map(|v| {
            T::try_from(v).map_err(|_| {
                StoreError::Inconsistent(format!("{} value {} is out of range", column, v))
            })
        })
        .transpose()
}

fn row_to_user(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        gender: row.try_get("gender")?,
        birth_date: row.try_get("birth_date")?,
        is_verified: row.try_get("is_verified")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_profile(row: &PgRow) -> Result<Profile, StoreError> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        display_name: row.try_get("display_name")?,
        bio: row.try_get("bio")?,
        city: row.try_get("city")?,
        interests: row.try_get("interests")?,
        location: GeoPoint::from_parts(row.try_get("location_lat")?, row.try_get("location_lon")?),
        pref_min_age: small_int("pref_min_age", row.try_get("pref_min_age")?)?,
        pref_max_age: small_int("pref_max_age", row.try_get("pref_max_age")?)?,
        pref_max_distance_km: small_int("pref_max_distance_km", row.try_get("pref_max_distance_km")?)?,
        is_onboarding_complete: row.try_get("is_onboarding_complete")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_swipe(row: &PgRow) -> Result<SwipeDecision, StoreError> {
    Ok(SwipeDecision {
        id: row.try_get("id")?,
        actor_id: row.try_get("swiper_id")?,
        target_id: row.try_get("swiped_id")?,
        is_like: row.try_get("is_like")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_match(row: &PgRow) -> Result<Match, StoreError> {
    Ok(Match {
        id: row.try_get("id")?,
        user1_id: row.try_get("user1_id")?,
        user2_id: row.try_get("user2_id")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, gender, birth_date, is_verified, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (gender, birth_date, is_verified)
            VALUES ($1, $2, $3)
            RETURNING id, gender, birth_date, is_verified, created_at
            "#,
        )
        .bind(user.gender)
        .bind(user.birth_date)
        .bind(user.is_verified)
        .fetch_one(&self.pool)
        .await?;

        row_to_user(&row)
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profiles (user_id, display_name, bio, city, interests, location_lat,
                location_lon, pref_min_age, pref_max_age, pref_max_distance_km, is_onboarding_complete)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(profile.user_id)
            .bind(&profile.display_name)
            .bind(&profile.bio)
            .bind(&profile.city)
            .bind(&profile.interests)
            .bind(profile.location.map(|p| p.latitude))
            .bind(profile.location.map(|p| p.longitude))
            .bind(profile.pref_min_age.map(i32::from))
            .bind(profile.pref_max_age.map(i32::from))
            .bind(profile.pref_max_distance_km.map(i32::from))
            .bind(profile.is_onboarding_complete)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, format!("profile for user {}", profile.user_id)))?;

        row_to_profile(&row)
    }

    async fn update(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            UPDATE profiles
            SET display_name = $1, bio = $2, city = $3, interests = $4, location_lat = $5,
                location_lon = $6, pref_min_age = $7, pref_max_age = $8,
                pref_max_distance_km = $9, is_onboarding_complete = $10, updated_at = NOW()
            WHERE id = $11
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&profile.display_name)
            .bind(&profile.bio)
            .bind(&profile.city)
            .bind(&profile.interests)
            .bind(profile.location.map(|p| p.latitude))
            .bind(profile.location.map(|p| p.longitude))
            .bind(profile.pref_min_age.map(i32::from))
            .bind(profile.pref_max_age.map(i32::from))
            .bind(profile.pref_max_distance_km.map(i32::from))
            .bind(profile.is_onboarding_complete)
            .bind(profile.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::Inconsistent(format!("profile {} does not exist", profile.id)))?;

        row_to_profile(&row)
    }

    async fn search(
        &self,
        query: &CandidateQuery,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Profile>, StoreError> {
        let mut builder = candidate_search_sql(query, limit, offset);
        let rows = builder.build().fetch_all(&self.pool).await?;

        tracing::debug!("Profile search returned {} rows", rows.len());

        rows.iter().map(row_to_profile).collect()
    }
}

#[async_trait]
impl SwipeStore for PostgresStore {
    async fn create(&self, swipe: NewSwipe) -> Result<SwipeDecision, StoreError> {
        let query = format!(
            r#"
            INSERT INTO swipes (swiper_id, swiped_id, is_like)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            SWIPE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(swipe.actor_id)
            .bind(swipe.target_id)
            .bind(swipe.is_like)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                constraint_error(e, format!("swipe {} -> {}", swipe.actor_id, swipe.target_id))
            })?;

        row_to_swipe(&row)
    }

    async fn get_by_users(
        &self,
        actor_id: UserId,
        target_id: UserId,
    ) -> Result<Option<SwipeDecision>, StoreError> {
        let query = format!(
            "SELECT {} FROM swipes WHERE swiper_id = $1 AND swiped_id = $2",
            SWIPE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(actor_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_swipe).transpose()
    }

    async fn count_mutual_likes(&self, user_a: UserId, user_b: UserId) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM swipes
            WHERE ((swiper_id = $1 AND swiped_id = $2) OR (swiper_id = $2 AND swiped_id = $1))
            AND is_like = TRUE
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn likes_received(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, StoreError> {
        let query = format!(
            r#"
            SELECT {} FROM swipes
            WHERE swiped_id = $1 AND is_like = TRUE
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            SWIPE_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_swipe).collect()
    }

    async fn count_likes_received(&self, user_id: UserId) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM swipes WHERE swiped_id = $1 AND is_like = TRUE")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }

    async fn list_by_actor(
        &self,
        actor_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SwipeDecision>, StoreError> {
        let query = format!(
            r#"
            SELECT {} FROM swipes
            WHERE swiper_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            SWIPE_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(actor_id)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_swipe).collect()
    }

    async fn delete_dislikes(&self, actor_id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM swipes WHERE swiper_id = $1 AND is_like = FALSE")
            .bind(actor_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn get_by_pair(
        &self,
        user1_id: UserId,
        user2_id: UserId,
    ) -> Result<Option<Match>, StoreError> {
        let query = format!(
            "SELECT {} FROM matches WHERE user1_id = $1 AND user2_id = $2",
            MATCH_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_match).transpose()
    }

    async fn create(&self, user1_id: UserId, user2_id: UserId) -> Result<Match, StoreError> {
        let query = format!(
            r#"
            INSERT INTO matches (user1_id, user2_id, is_active)
            VALUES ($1, $2, TRUE)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, format!("match ({}, {})", user1_id, user2_id)))?;

        row_to_match(&row)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {} FROM matches
            WHERE user1_id = $1 OR user2_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            MATCH_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_match).collect()
    }
}
