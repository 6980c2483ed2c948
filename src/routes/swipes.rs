use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{MatchesResponse, PageQuery, SwipeRequest, UserId};
use crate::routes::{error_response, validation_failed, AppState};

/// Configure swipe, like and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{id}/swipes", web::post().to(record_swipe))
        .route("/users/{id}/swipes", web::get().to(list_swipes))
        .route("/users/{id}/likes-received", web::get().to(likes_received))
        .route("/users/{id}/matches", web::get().to(list_matches));
}

/// Like or dislike another user
///
/// POST /api/v1/users/{id}/swipes
///
/// Request body:
/// ```json
/// {
///   "targetUserId": 42,
///   "isLike": true
/// }
/// ```
async fn record_swipe(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    req: web::Json<SwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for swipe request: {:?}", errors);
        return validation_failed(errors.to_string());
    }

    let actor_id = path.into_inner();

    match state.swipes.swipe(actor_id, req.target_user_id, req.is_like).await {
        Ok(outcome) => {
            if outcome.is_match {
                tracing::info!("Swipe {} -> {} produced a match", actor_id, req.target_user_id);
            }
            HttpResponse::Ok().json(outcome)
        }
        Err(e) => error_response(e),
    }
}

/// The user's own decisions, newest first
///
/// GET /api/v1/users/{id}/swipes?limit={limit}&offset={offset}
async fn list_swipes(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let limit = state.page_limit(&query);
    match state.swipes.decisions(path.into_inner(), limit, query.offset).await {
        Ok(decisions) => HttpResponse::Ok().json(decisions),
        Err(e) => error_response(e),
    }
}

/// Users who liked this user, newest first
///
/// GET /api/v1/users/{id}/likes-received?limit={limit}&offset={offset}
async fn likes_received(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let limit = state.page_limit(&query);
    match state.swipes.likes_received(path.into_inner(), limit, query.offset).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/users/{id}/matches?limit={limit}&offset={offset}
async fn list_matches(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let limit = state.page_limit(&query);
    match state.swipes.matches(path.into_inner(), limit, query.offset).await {
        Ok(matches) => HttpResponse::Ok().json(MatchesResponse { matches }),
        Err(e) => error_response(e),
    }
}
