//! Matchfeed - candidate feed and mutual-match engine for a dating app
//!
//! This library decides which profile a user sees next, records like/dislike
//! decisions and turns a pair of mutual likes into exactly one match.
//! Persistence sits behind the store traits in [`services`], with PostgreSQL
//! for production and an in-memory store for tests.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    haversine_distance, is_eligible, EngineError, FeedResetter, FeedSelector, MatchResolver,
    ProfileService, SwipeLedger, SwipeOutcome, SwipeService,
};
pub use models::{Gender, GeoPoint, Match, Profile, ProfileCard, SwipeDecision, User, UserId};
