// Route exports
pub mod feed;
pub mod profiles;
pub mod swipes;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::config::FeedSettings;
use crate::core::{
    EngineError, FeedResetter, FeedSelector, MatchResolver, ProfileService, SwipeLedger,
    SwipeService,
};
use crate::models::{ErrorResponse, PageQuery};
use crate::services::{HealthCheck, MatchStore, ProfileStore, SwipeStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedSelector,
    pub resetter: FeedResetter,
    pub swipes: SwipeService,
    pub profiles: ProfileService,
    pub health: Arc<dyn HealthCheck>,
    pub paging: FeedSettings,
}

impl AppState {
    /// Wire the engine services over the given stores
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        users: Arc<dyn UserStore>,
        swipes: Arc<dyn SwipeStore>,
        matches: Arc<dyn MatchStore>,
        health: Arc<dyn HealthCheck>,
        settings: FeedSettings,
    ) -> Self {
        let ledger = SwipeLedger::new(swipes);
        let resolver = MatchResolver::new(matches);

        Self {
            feed: FeedSelector::new(
                profiles.clone(),
                users.clone(),
                ledger.clone(),
                settings.batch_size,
            ),
            resetter: FeedResetter::new(ledger.clone()),
            swipes: SwipeService::new(profiles.clone(), users.clone(), ledger, resolver),
            profiles: ProfileService::new(profiles, users),
            health,
            paging: settings,
        }
    }

    fn page_limit(&self, query: &PageQuery) -> u32 {
        query.effective_limit(self.paging.likes_default_limit, self.paging.likes_max_limit)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(feed::configure)
            .configure(swipes::configure)
            .configure(profiles::configure),
    );
}

/// Map an engine failure onto its HTTP status and JSON body
pub fn error_response(err: EngineError) -> HttpResponse {
    let (status, error) = match &err {
        EngineError::SelfSwipe => (StatusCode::BAD_REQUEST, "Cannot swipe yourself"),
        EngineError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
        EngineError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, "Profile not found"),
        EngineError::UserNotFound(_) => (StatusCode::NOT_FOUND, "User not found"),
        EngineError::DuplicateSwipe { .. } => (StatusCode::CONFLICT, "Swipe already exists"),
        EngineError::ProfileAlreadyExists(_) => (StatusCode::CONFLICT, "Profile already exists"),
        EngineError::StoreUnavailable(e) => {
            tracing::error!("Store failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store unavailable")
        }
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

fn validation_failed(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}
