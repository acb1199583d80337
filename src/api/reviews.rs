use crate::{database::MongoDB, services::review_service, utils::AppError};
use actix_web::{web, HttpResponse};
use serde_json::Value;

/// GET /reviews
pub async fn list_reviews(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /reviews");

    let reviews = review_service::list_reviews(&db).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /reviews - Stores the body as-is
pub async fn add_review(
    db: web::Data<MongoDB>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /reviews");

    let result = review_service::add_review(&db, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /add-db - Bulk import of review documents
pub async fn import_reviews(
    db: web::Data<MongoDB>,
    body: web::Json<Vec<Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("📦 POST /add-db - {} documents", body.len());

    let result = review_service::import_reviews(&db, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}
