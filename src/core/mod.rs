// Core engine exports
pub mod distance;
pub mod error;
pub mod feed;
pub mod filters;
pub mod ledger;
pub mod profiles;
pub mod resolver;
pub mod swipes;

pub use distance::{distance_between, haversine_distance, optional_distance};
pub use error::EngineError;
pub use feed::{FeedResetter, FeedSelector, DEFAULT_BATCH_SIZE};
pub use filters::{is_eligible, matches_age, matches_city, matches_distance, matches_gender};
pub use ledger::SwipeLedger;
pub use profiles::ProfileService;
pub use resolver::{canonical_pair, MatchResolver};
pub use swipes::{SwipeOutcome, SwipeService};
