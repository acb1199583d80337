use crate::{
    database::MongoDB,
    middleware::ensure_own_email,
    models::{CreateUserRequest, CreateUserResponse, UpdateUserRequest},
    services::{auth_service::Claims, user_service},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

/// POST /users - Signs up a user; an existing email is reported, not overwritten
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created, or `insertedId: null` when the email exists", body = CreateUserResponse)
    )
)]
pub async fn create_user(
    db: web::Data<MongoDB>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 POST /users - {}", request.email);

    let response = user_service::create_user(&db, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /users/{email}
pub async fn get_user(
    claims: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    ensure_own_email(&claims, &email)?;
    log::info!("👤 GET /users/{}", email);

    let user = user_service::get_user(&db, &email).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /users/{email} - Profile edit (name, location, phone)
pub async fn update_user(
    claims: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    email: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    ensure_own_email(&claims, &email)?;
    log::info!("🔧 PUT /users/{}", email);

    let result = user_service::update_user(&db, &email, &request).await?;
    Ok(HttpResponse::Ok().json(result))
}
