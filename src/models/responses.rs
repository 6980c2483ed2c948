use serde::{Deserialize, Serialize};
use crate::models::domain::{Match, ProfileCard};

/// Response for the next feed candidate.
///
/// `user` is `null` when the feed is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub user: Option<ProfileCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A like received from another user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeReceived {
    pub swipe_id: i64,
    pub user: ProfileCard,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Page of likes received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikesReceivedResponse {
    pub likes: Vec<LikeReceived>,
    pub total: u64,
}

/// Page of matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}

/// Response for resetting dislikes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub message: String,
    pub reset_count: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
