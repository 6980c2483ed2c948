// Unit tests for matchfeed

use chrono::{NaiveDate, Utc};
use matchfeed::core::{
    distance::{distance_between, haversine_distance, optional_distance},
    filters::{is_eligible, matches_age, matches_city, matches_distance, matches_gender},
    resolver::canonical_pair,
};
use matchfeed::models::{
    Gender, GeoPoint, PageQuery, Profile, SwipeRequest, UpdateProfileRequest, User, UserId,
};
use validator::Validate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn create_test_user(id: UserId, gender: Gender, age: i32) -> User {
    User {
        id,
        gender,
        birth_date: NaiveDate::from_ymd_opt(2025 - age, 1, 15).unwrap(),
        is_verified: true,
        created_at: Utc::now(),
    }
}

fn create_test_profile(user_id: UserId, city: &str, location: Option<GeoPoint>) -> Profile {
    Profile {
        id: user_id * 10,
        user_id,
        display_name: Some(format!("User {}", user_id)),
        bio: None,
        city: Some(city.to_string()),
        interests: vec!["hiking".to_string()],
        location,
        pref_min_age: Some(20),
        pref_max_age: Some(30),
        pref_max_distance_km: Some(50),
        is_onboarding_complete: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn moscow_center() -> Option<GeoPoint> {
    Some(GeoPoint::new(55.75, 37.62))
}

fn moscow_north() -> Option<GeoPoint> {
    Some(GeoPoint::new(55.80, 37.70))
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(55.75, 37.62, 55.75, 37.62);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_haversine_one_degree_latitude_at_equator() {
    let distance = haversine_distance(0.0, 0.0, 1.0, 0.0);
    assert!((distance - 111.19).abs() < 0.05);
}

#[test]
fn test_haversine_is_symmetric() {
    let points = [
        (55.75, 37.62, 55.80, 37.70),
        (-33.87, 151.21, 40.71, -74.01),
        (89.9, 0.0, -89.9, 179.9),
    ];
    for (lat1, lon1, lat2, lon2) in points {
        let forward = haversine_distance(lat1, lon1, lat2, lon2);
        let backward = haversine_distance(lat2, lon2, lat1, lon1);
        assert!((forward - backward).abs() < 1e-9);
    }
}

#[test]
fn test_moscow_points_are_close() {
    let distance = distance_between(moscow_center().unwrap(), moscow_north().unwrap());
    assert!(distance > 5.0 && distance < 10.0);
}

#[test]
fn test_optional_distance_needs_both_points() {
    assert!(optional_distance(moscow_center(), None).is_none());
    assert!(optional_distance(None, moscow_north()).is_none());
    assert!(optional_distance(moscow_center(), moscow_north()).is_some());
}

#[test]
fn test_eligible_baseline() {
    let viewer = create_test_user(1, Gender::Male, 27);
    let viewer_profile = create_test_profile(1, "Moscow", moscow_center());
    let candidate = create_test_user(2, Gender::Female, 25);
    let candidate_profile = create_test_profile(2, "Moscow", moscow_north());

    assert!(is_eligible(&viewer, &viewer_profile, &candidate, &candidate_profile, today()));
}

#[test]
fn test_ineligible_when_onboarding_incomplete() {
    let viewer = create_test_user(1, Gender::Male, 27);
    let viewer_profile = create_test_profile(1, "Moscow", moscow_center());
    let candidate = create_test_user(2, Gender::Female, 25);
    let mut candidate_profile = create_test_profile(2, "Moscow", moscow_north());
    candidate_profile.is_onboarding_complete = false;

    assert!(!is_eligible(&viewer, &viewer_profile, &candidate, &candidate_profile, today()));
}

#[test]
fn test_ineligible_in_other_city() {
    let viewer = create_test_user(1, Gender::Male, 27);
    let viewer_profile = create_test_profile(1, "Moscow", None);
    let candidate = create_test_user(2, Gender::Female, 25);
    let candidate_profile = create_test_profile(2, "Saint Petersburg", None);

    assert!(!matches_city(&viewer_profile, &candidate_profile));
    assert!(!is_eligible(&viewer, &viewer_profile, &candidate, &candidate_profile, today()));
}

#[test]
fn test_empty_viewer_city_does_not_filter() {
    let mut viewer_profile = create_test_profile(1, "", None);
    let candidate_profile = create_test_profile(2, "Kazan", None);
    assert!(matches_city(&viewer_profile, &candidate_profile));

    viewer_profile.city = None;
    assert!(matches_city(&viewer_profile, &candidate_profile));
}

#[test]
fn test_ineligible_outside_age_range() {
    let viewer = create_test_user(1, Gender::Male, 27);
    let viewer_profile = create_test_profile(1, "Moscow", moscow_center());
    let candidate_profile = create_test_profile(2, "Moscow", moscow_north());

    let too_young = create_test_user(2, Gender::Female, 19);
    let too_old = create_test_user(2, Gender::Female, 31);
    assert!(!is_eligible(&viewer, &viewer_profile, &too_young, &candidate_profile, today()));
    assert!(!is_eligible(&viewer, &viewer_profile, &too_old, &candidate_profile, today()));

    // bounds are inclusive
    assert!(matches_age(&viewer_profile, 20));
    assert!(matches_age(&viewer_profile, 30));
}

#[test]
fn test_ineligible_same_gender() {
    let viewer = create_test_user(1, Gender::Female, 27);
    let viewer_profile = create_test_profile(1, "Moscow", moscow_center());
    let candidate = create_test_user(2, Gender::Female, 25);
    let candidate_profile = create_test_profile(2, "Moscow", moscow_north());

    assert!(!matches_gender(&viewer, &candidate));
    assert!(!is_eligible(&viewer, &viewer_profile, &candidate, &candidate_profile, today()));
}

#[test]
fn test_ineligible_beyond_max_distance() {
    let viewer = create_test_user(1, Gender::Male, 27);
    let viewer_profile = create_test_profile(1, "Moscow", moscow_center());
    let candidate = create_test_user(2, Gender::Female, 25);
    // same city label, but roughly 75 km away
    let candidate_profile = create_test_profile(2, "Moscow", Some(GeoPoint::new(56.42, 37.62)));

    assert!(!matches_distance(&viewer_profile, &candidate_profile));
    assert!(!is_eligible(&viewer, &viewer_profile, &candidate, &candidate_profile, today()));
}

#[test]
fn test_distance_filter_skipped_without_coordinates() {
    let viewer_profile = create_test_profile(1, "Moscow", None);
    let candidate_profile = create_test_profile(2, "Moscow", Some(GeoPoint::new(10.0, 10.0)));
    assert!(matches_distance(&viewer_profile, &candidate_profile));
}

#[test]
fn test_viewer_never_eligible_for_self() {
    let viewer = create_test_user(1, Gender::Male, 27);
    let viewer_profile = create_test_profile(1, "Moscow", moscow_center());
    let mirrored = create_test_user(1, Gender::Female, 25);

    assert!(!is_eligible(&viewer, &viewer_profile, &mirrored, &viewer_profile, today()));
}

#[test]
fn test_canonical_pair_orders_ids() {
    assert_eq!(canonical_pair(12, 3), (3, 12));
    assert_eq!(canonical_pair(3, 12), (3, 12));
}

#[test]
fn test_swipe_request_accepts_camel_and_snake_case() {
    let camel: SwipeRequest = serde_json::from_str(r#"{"targetUserId": 5, "isLike": true}"#).unwrap();
    let snake: SwipeRequest = serde_json::from_str(r#"{"target_user_id": 5, "is_like": false}"#).unwrap();

    assert_eq!(camel.target_user_id, 5);
    assert!(camel.is_like);
    assert!(!snake.is_like);
    assert!(camel.validate().is_ok());
}

#[test]
fn test_page_query_limit_is_capped() {
    let query = PageQuery { limit: Some(500), offset: 0 };
    assert_eq!(query.effective_limit(20, 100), 100);

    let query = PageQuery { limit: None, offset: 0 };
    assert_eq!(query.effective_limit(20, 100), 20);
}

#[test]
fn test_update_request_rejects_half_location() {
    let request = UpdateProfileRequest {
        latitude: Some(55.75),
        ..Default::default()
    };
    assert!(request.check().is_err());
}

#[test]
fn test_update_request_rejects_inverted_ages() {
    let request = UpdateProfileRequest {
        pref_min_age: Some(35),
        pref_max_age: Some(25),
        ..Default::default()
    };
    assert!(request.check().is_err());
}
