use crate::{
    database::MongoDB,
    middleware::ensure_own_email,
    models::{RegisterRequest, UpdateConfirmationRequest},
    services::{auth_service::Claims, registration_service},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

/// POST /register-campain - Registers a participant and bumps the camp's count
#[utoipa::path(
    post,
    path = "/register-campain",
    tag = "Registrations",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration stored", body = crate::models::InsertedResponse),
        (status = 404, description = "No such camp"),
        (status = 409, description = "Already registered for this camp")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📝 POST /register-campain - {} for camp {}",
        request.participant_email,
        request.camp_id
    );

    let result = registration_service::register_participant(&db, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// DELETE /delete-reg-camp/{id}
pub async fn delete_registration(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /delete-reg-camp/{}", id);

    let result = registration_service::delete_registration(&db, &id).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /manage-registered-camps - Every registration joined with its camp
pub async fn manage_registrations(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /manage-registered-camps");

    let rows = registration_service::all_registrations(&db).await?;
    log::info!("✅ Found {} registrations", rows.len());
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /manage-registered-camps-pagination/{page}
pub async fn manage_registrations_page(
    db: web::Data<MongoDB>,
    page: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /manage-registered-camps-pagination/{}", page);

    let result = registration_service::registrations_page(&db, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /registered-camps/{email}
pub async fn registered_camps(
    claims: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    ensure_own_email(&claims, &email)?;
    log::info!("📋 GET /registered-camps/{}", email);

    let rows = registration_service::registrations_for(&db, &email).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /analytics-registered-camps/{email} - Chart data for the participant dashboard
pub async fn registration_analytics(
    claims: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    ensure_own_email(&claims, &email)?;
    log::info!("📊 GET /analytics-registered-camps/{}", email);

    let rows = registration_service::analytics_for(&db, &email).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// PATCH /update-confirmation-status/{id}
pub async fn update_confirmation_status(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<UpdateConfirmationRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "🔧 PATCH /update-confirmation-status/{} -> {}",
        id,
        request.confirmation_status
    );

    let result =
        registration_service::update_confirmation_status(&db, &id, &request.confirmation_status)
            .await?;
    Ok(HttpResponse::Ok().json(result))
}
