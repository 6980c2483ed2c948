use chrono::NaiveDate;

use crate::core::distance::optional_distance;
use crate::models::{Profile, User};

/// Candidate must be in the viewer's city when the viewer has one set.
///
/// Comparison is exact and case-sensitive.
#[inline]
pub fn matches_city(viewer_profile: &Profile, candidate_profile: &Profile) -> bool {
    match viewer_profile.city_filter() {
        Some(city) => candidate_profile.city.as_deref() == Some(city),
        None => true,
    }
}

/// Age falls inside the viewer's bounds; an unset bound is open on that side
#[inline]
pub fn matches_age(viewer_profile: &Profile, candidate_age: u8) -> bool {
    if let Some(min) = viewer_profile.pref_min_age {
        if candidate_age < min {
            return false;
        }
    }
    if let Some(max) = viewer_profile.pref_max_age {
        if candidate_age > max {
            return false;
        }
    }
    true
}

/// Only opposite-gender pairs are shown for now
#[inline]
pub fn matches_gender(viewer: &User, candidate: &User) -> bool {
    viewer.gender != candidate.gender
}

/// Candidate lies within the viewer's maximum distance.
///
/// Passes when either side has no coordinates or the viewer has no bound.
#[inline]
pub fn matches_distance(viewer_profile: &Profile, candidate_profile: &Profile) -> bool {
    let Some(max_km) = viewer_profile.pref_max_distance_km else {
        return true;
    };
    match optional_distance(viewer_profile.location, candidate_profile.location) {
        Some(distance_km) => distance_km <= f64::from(max_km),
        None => true,
    }
}

/// Whether `candidate` may be shown to `viewer`.
///
/// Pure and deterministic: `today` fixes the day the candidate's age is taken on.
pub fn is_eligible(
    viewer: &User,
    viewer_profile: &Profile,
    candidate: &User,
    candidate_profile: &Profile,
    today: NaiveDate,
) -> bool {
    candidate.id != viewer.id
        && candidate_profile.user_id != viewer.id
        && candidate_profile.is_onboarding_complete
        && matches_city(viewer_profile, candidate_profile)
        && matches_age(viewer_profile, candidate.age_on(today))
        && matches_gender(viewer, candidate)
        && matches_distance(viewer_profile, candidate_profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GeoPoint};
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn create_test_user(id: i64, gender: Gender, age: i32) -> User {
        User {
            id,
            gender,
            birth_date: NaiveDate::from_ymd_opt(2025 - age, 1, 1).unwrap(),
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    fn create_test_profile(user_id: i64, city: Option<&str>, location: Option<GeoPoint>) -> Profile {
        Profile {
            id: user_id * 10,
            user_id,
            display_name: Some(format!("User {}", user_id)),
            bio: None,
            city: city.map(str::to_string),
            interests: vec!["music".to_string()],
            location,
            pref_min_age: Some(20),
            pref_max_age: Some(30),
            pref_max_distance_km: Some(50),
            is_onboarding_complete: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture() -> (User, Profile, User, Profile) {
        let viewer = create_test_user(1, Gender::Male, 27);
        let viewer_profile = create_test_profile(1, Some("Moscow"), Some(GeoPoint::new(55.75, 37.62)));
        let candidate = create_test_user(2, Gender::Female, 25);
        let candidate_profile = create_test_profile(2, Some("Moscow"), Some(GeoPoint::new(55.80, 37.70)));
        (viewer, viewer_profile, candidate, candidate_profile)
    }

    #[test]
    fn test_eligible_baseline() {
        let (v, vp, c, cp) = fixture();
        assert!(is_eligible(&v, &vp, &c, &cp, today()));
    }

    #[test]
    fn test_self_rejected() {
        let (v, vp, _, _) = fixture();
        assert!(!is_eligible(&v, &vp, &v, &vp, today()));
    }

    #[test]
    fn test_incomplete_onboarding_rejected() {
        let (v, vp, c, mut cp) = fixture();
        cp.is_onboarding_complete = false;
        assert!(!is_eligible(&v, &vp, &c, &cp, today()));
    }

    #[test]
    fn test_wrong_city_rejected() {
        let (v, vp, c, mut cp) = fixture();
        cp.city = Some("moscow".to_string());
        assert!(!is_eligible(&v, &vp, &c, &cp, today()));

        cp.city = None;
        assert!(!is_eligible(&v, &vp, &c, &cp, today()));
    }

    #[test]
    fn test_empty_viewer_city_does_not_filter() {
        let (v, mut vp, c, mut cp) = fixture();
        vp.city = Some(String::new());
        cp.city = Some("Kazan".to_string());
        assert!(is_eligible(&v, &vp, &c, &cp, today()));
    }

    #[test]
    fn test_age_bounds() {
        let (v, vp, _, cp) = fixture();
        let too_young = create_test_user(2, Gender::Female, 19);
        let too_old = create_test_user(2, Gender::Female, 31);
        let at_edge = create_test_user(2, Gender::Female, 30);

        assert!(!is_eligible(&v, &vp, &too_young, &cp, today()));
        assert!(!is_eligible(&v, &vp, &too_old, &cp, today()));
        assert!(is_eligible(&v, &vp, &at_edge, &cp, today()));
    }

    #[test]
    fn test_unset_age_bound_is_open() {
        let (v, mut vp, _, cp) = fixture();
        vp.pref_max_age = None;
        let older = create_test_user(2, Gender::Female, 60);
        assert!(is_eligible(&v, &vp, &older, &cp, today()));
    }

    #[test]
    fn test_same_gender_rejected() {
        let (v, vp, mut c, cp) = fixture();
        c.gender = Gender::Male;
        assert!(!is_eligible(&v, &vp, &c, &cp, today()));
    }

    #[test]
    fn test_over_distance_rejected() {
        let (v, vp, c, mut cp) = fixture();
        // St Petersburg, ~630 km away
        cp.location = Some(GeoPoint::new(59.94, 30.31));
        assert!(!is_eligible(&v, &vp, &c, &cp, today()));
    }

    #[test]
    fn test_missing_coordinates_skip_distance_rule() {
        let (v, vp, c, mut cp) = fixture();
        cp.location = None;
        assert!(is_eligible(&v, &vp, &c, &cp, today()));
    }
}
