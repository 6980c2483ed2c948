use actix_web::{web, HttpResponse, Responder};

use crate::models::{CreateProfileRequest, ProfileViewQuery, UpdateProfileRequest, UserId};
use crate::routes::{error_response, validation_failed, AppState};

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{id}/profile", web::post().to(create_profile))
        .route("/users/{id}/profile", web::get().to(get_profile))
        .route("/users/{id}/profile", web::put().to(update_profile));
}

/// Onboard a user with their first profile
///
/// POST /api/v1/users/{id}/profile
///
/// Responds 201 with the stored profile, 409 if the user already has one.
async fn create_profile(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    req: web::Json<CreateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.check() {
        tracing::info!("Validation failed for profile create: {:?}", errors);
        return validation_failed(errors.to_string());
    }

    match state.profiles.create(path.into_inner(), &req).await {
        Ok(profile) => HttpResponse::Created().json(profile),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/users/{id}/profile?viewerId=
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    query: web::Query<ProfileViewQuery>,
) -> impl Responder {
    match state.profiles.view(path.into_inner(), query.viewer_id).await {
        Ok(card) => HttpResponse::Ok().json(card),
        Err(e) => error_response(e),
    }
}

/// Update display attributes and partner preferences
///
/// PUT /api/v1/users/{id}/profile
///
/// Only the fields present in the body change. `latitude` and `longitude`
/// must be sent together.
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.check() {
        tracing::info!("Validation failed for profile update: {:?}", errors);
        return validation_failed(errors.to_string());
    }

    match state.profiles.update(path.into_inner(), &req).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => error_response(e),
    }
}
