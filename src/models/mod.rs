// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateQuery, Gender, GeoPoint, Match, NewProfile, NewSwipe, NewUser, Profile, ProfileCard,
    SwipeDecision, User, UserId,
};
pub use requests::{
    CreateProfileRequest, PageQuery, ProfileViewQuery, SwipeRequest, UpdateProfileRequest,
};
pub use responses::{
    ErrorResponse, FeedResponse, HealthResponse, LikeReceived, LikesReceivedResponse,
    MatchesResponse, ResetResponse,
};
