use actix_web::{web, HttpResponse, Responder};

use crate::models::{FeedResponse, HealthResponse, ResetResponse, UserId};
use crate::routes::{error_response, AppState};

/// Configure health and feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/users/{id}/feed/next", web::get().to(next_in_feed))
        .route("/users/{id}/feed/reset-dislikes", web::post().to(reset_dislikes));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.health.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Next profile to show
///
/// GET /api/v1/users/{id}/feed/next
///
/// An exhausted feed is still a 200 with `"user": null`.
async fn next_in_feed(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    match state.feed.next_candidate(user_id).await {
        Ok(Some(card)) => HttpResponse::Ok().json(FeedResponse {
            user: Some(card),
            message: None,
        }),
        Ok(None) => HttpResponse::Ok().json(FeedResponse {
            user: None,
            message: Some("no more users in feed".to_string()),
        }),
        Err(e) => error_response(e),
    }
}

/// Forget the user's dislikes so those profiles can come back
///
/// POST /api/v1/users/{id}/feed/reset-dislikes
async fn reset_dislikes(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    match state.resetter.reset_feed(user_id).await {
        Ok(reset_count) => HttpResponse::Ok().json(ResetResponse {
            message: "dislikes reset".to_string(),
            reset_count,
        }),
        Err(e) => error_response(e),
    }
}
