use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::domain::{GeoPoint, NewProfile, Profile, UserId};

/// Request to like or dislike another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: i64,
    #[serde(alias = "is_like", rename = "isLike")]
    pub is_like: bool,
}

/// Limit/offset pagination query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

impl PageQuery {
    /// Effective limit: the requested one (or `default`) capped at `max`
    pub fn effective_limit(&self, default: u32, max: u32) -> u32 {
        self.limit.unwrap_or(default).min(max)
    }
}

/// Owner update of display attributes and partner preferences.
///
/// Absent fields are left unchanged. Coordinates are replaced as a pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    pub interests: Option<Vec<String>>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 18, max = 100))]
    pub pref_min_age: Option<u8>,
    #[validate(range(min = 18, max = 100))]
    pub pref_max_age: Option<u8>,
    #[validate(range(min = 1, max = 20000))]
    pub pref_max_distance_km: Option<u16>,
    pub is_onboarding_complete: Option<bool>,
}

impl UpdateProfileRequest {
    /// Field rules plus the cross-field rules of this request
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(e) = validate_location_pair(self.latitude, self.longitude) {
            errors.add("latitude", e);
        }
        if let Err(e) = validate_age_bounds(self.pref_min_age, self.pref_max_age) {
            errors.add("prefMinAge", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merge this request into `profile`, re-checking the age bounds of the result
    pub fn apply_to(&self, mut profile: Profile) -> Result<Profile, ValidationErrors> {
        self.check()?;

        if let Some(name) = &self.display_name {
            profile.display_name = Some(name.clone());
        }
        if let Some(bio) = &self.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(city) = &self.city {
            profile.city = if city.is_empty() { None } else { Some(city.clone()) };
        }
        if let Some(interests) = &self.interests {
            profile.interests = interests.clone();
        }
        if let Some(point) = GeoPoint::from_parts(self.latitude, self.longitude) {
            profile.location = Some(point);
        }
        if self.pref_min_age.is_some() {
            profile.pref_min_age = self.pref_min_age;
        }
        if self.pref_max_age.is_some() {
            profile.pref_max_age = self.pref_max_age;
        }
        if self.pref_max_distance_km.is_some() {
            profile.pref_max_distance_km = self.pref_max_distance_km;
        }
        if let Some(complete) = self.is_onboarding_complete {
            profile.is_onboarding_complete = complete;
        }

        if let Err(e) = validate_age_bounds(profile.pref_min_age, profile.pref_max_age) {
            let mut errors = ValidationErrors::new();
            errors.add("prefMinAge", e);
            return Err(errors);
        }

        Ok(profile)
    }
}

/// Onboarding body for a user's first profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 64))]
    pub display_name: String,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub interests: Vec<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 18, max = 100))]
    pub pref_min_age: Option<u8>,
    #[validate(range(min = 18, max = 100))]
    pub pref_max_age: Option<u8>,
    #[validate(range(min = 1, max = 20000))]
    pub pref_max_distance_km: Option<u16>,
}

impl CreateProfileRequest {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(e) = validate_location_pair(self.latitude, self.longitude) {
            errors.add("latitude", e);
        }
        if let Err(e) = validate_age_bounds(self.pref_min_age, self.pref_max_age) {
            errors.add("prefMinAge", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Insert fields for `user_id`; creating a profile completes onboarding
    pub fn to_new_profile(&self, user_id: UserId) -> NewProfile {
        NewProfile {
            user_id,
            display_name: Some(self.display_name.clone()),
            bio: self.bio.clone(),
            city: self.city.clone().filter(|c| !c.is_empty()),
            interests: self.interests.clone(),
            location: GeoPoint::from_parts(self.latitude, self.longitude),
            pref_min_age: self.pref_min_age,
            pref_max_age: self.pref_max_age,
            pref_max_distance_km: self.pref_max_distance_km,
            is_onboarding_complete: true,
        }
    }
}

/// Optional viewer for a profile view; distance is only reported with one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileViewQuery {
    #[serde(rename = "viewerId")]
    pub viewer_id: Option<UserId>,
}

/// Latitude and longitude must be given together
pub fn validate_location_pair(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), ValidationError> {
    if latitude.is_some() != longitude.is_some() {
        let mut error = ValidationError::new("location_pair");
        error.message = Some(Cow::from("latitude and longitude must be set together"));
        return Err(error);
    }
    Ok(())
}

/// Minimum preferred age must not exceed the maximum when both are set
pub fn validate_age_bounds(min_age: Option<u8>, max_age: Option<u8>) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (min_age, max_age) {
        if min > max {
            let mut error = ValidationError::new("age_bounds");
            error.message = Some(Cow::from("prefMinAge must not exceed prefMaxAge"));
            return Err(error);
        }
    }
    Ok(())
}
