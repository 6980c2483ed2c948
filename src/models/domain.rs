use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Numeric user identifier. Ordering matters: matches store the smaller id first.
pub type UserId = i64;

/// Declared gender of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Account record owned by the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Age in whole calendar years on the given day.
    ///
    /// A birth date in the future yields 0.
    pub fn age_on(&self, today: NaiveDate) -> u8 {
        today
            .years_since(self.birth_date)
            .map(|years| u8::try_from(years).unwrap_or(u8::MAX))
            .unwrap_or(0)
    }

    /// Age in whole calendar years as of today (UTC)
    pub fn age(&self) -> u8 {
        self.age_on(Utc::now().date_naive())
    }
}

/// Fields needed to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub is_verified: bool,
}

/// A latitude/longitude pair in degrees.
///
/// Profiles hold `Option<GeoPoint>`, so a coordinate can never be present without its partner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point from two nullable columns, `None` unless both are present
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }
}

/// Dating profile with display attributes and partner preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub location: Option<GeoPoint>,
    pub pref_min_age: Option<u8>,
    pub pref_max_age: Option<u8>,
    pub pref_max_distance_km: Option<u16>,
    pub is_onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// City filter to apply to candidates, if the viewer set a non-empty one
    pub fn city_filter(&self) -> Option<&str> {
        self.city.as_deref().filter(|city| !city.is_empty())
    }
}

/// Fields needed to create a profile
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub interests: Vec<String>,
    pub location: Option<GeoPoint>,
    pub pref_min_age: Option<u8>,
    pub pref_max_age: Option<u8>,
    pub pref_max_distance_km: Option<u16>,
    pub is_onboarding_complete: bool,
}

/// A directional like/dislike decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeDecision {
    pub id: i64,
    pub actor_id: UserId,
    pub target_id: UserId,
    pub is_like: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to record a decision
#[derive(Debug, Clone, Copy)]
pub struct NewSwipe {
    pub actor_id: UserId,
    pub target_id: UserId,
    pub is_like: bool,
}

/// Symmetric mutual-like record, stored with `user1_id < user2_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Typed candidate search criteria passed to the profile store.
///
/// Each `None` field leaves that predicate out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateQuery {
    pub is_onboarding_complete: Option<bool>,
    pub city: Option<String>,
}

/// Display view of another user's profile, with derived age and optional distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCard {
    pub profile_id: i64,
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub age: u8,
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ProfileCard {
    pub fn new(profile: Profile, age: u8, distance_km: Option<f64>) -> Self {
        Self {
            profile_id: profile.id,
            user_id: profile.user_id,
            display_name: profile.display_name,
            bio: profile.bio,
            city: profile.city,
            age,
            interests: profile.interests,
            distance_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_born(year: i32, month: u32, day: u32) -> User {
        User {
            id: 1,
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_age_counts_whole_years() {
        let user = user_born(2000, 6, 15);
        let day_before = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        assert_eq!(user.age_on(day_before), 24);
        assert_eq!(user.age_on(birthday), 25);
    }

    #[test]
    fn test_future_birth_date_is_zero() {
        let user = user_born(2030, 1, 1);
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), 0);
    }

    #[test]
    fn test_geo_point_requires_both_parts() {
        assert!(GeoPoint::from_parts(Some(55.75), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(37.62)).is_none());
        assert_eq!(
            GeoPoint::from_parts(Some(55.75), Some(37.62)),
            Some(GeoPoint::new(55.75, 37.62))
        );
    }

    #[test]
    fn test_gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
    }
}
