use crate::{
    database::{query::CampaignQuery, MongoDB},
    models::{Campaign, CreateCampaignRequest, UpdateCampaignRequest},
    services::campaign_service,
    utils::AppError,
};
use actix_web::{web, HttpResponse};

/// GET /campains - All camps, filtered by `search` and ordered by `sortBy`
pub async fn list_campaigns(
    db: web::Data<MongoDB>,
    query: web::Query<CampaignQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /campains - search={:?} sortBy={:?}", query.search, query.sort_by);

    let camps = campaign_service::list_campaigns(&db, &query).await?;
    log::info!("✅ Found {} camps", camps.len());
    Ok(HttpResponse::Ok().json(camps))
}

/// GET /campains/{page} - One page of ten, with the total match count
pub async fn list_campaigns_page(
    db: web::Data<MongoDB>,
    page: web::Path<i64>,
    query: web::Query<CampaignQuery>,
) -> Result<HttpResponse, AppError> {
    let page = page.into_inner();
    log::info!("📋 GET /campains/{} - search={:?} sortBy={:?}", page, query.search, query.sort_by);

    let result = campaign_service::list_campaigns_page(&db, &query, page).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /popular-campain - Six camps with the most participants
#[utoipa::path(
    get,
    path = "/popular-campain",
    tag = "Camps",
    responses((status = 200, description = "Most popular camps", body = [Campaign]))
)]
pub async fn popular_campaigns(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔥 GET /popular-campain");

    let camps = campaign_service::popular_campaigns(&db).await?;
    Ok(HttpResponse::Ok().json(camps))
}

#[utoipa::path(
    get,
    path = "/camp-details/{id}",
    tag = "Camps",
    params(("id" = String, Path, description = "Camp ObjectId (hex)")),
    responses(
        (status = 200, description = "Camp", body = Campaign),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such camp")
    )
)]
pub async fn camp_details(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /camp-details/{}", id);

    let camp = campaign_service::get_campaign(&db, &id).await?;
    Ok(HttpResponse::Ok().json(camp))
}

/// POST /add-camp
pub async fn add_campaign(
    db: web::Data<MongoDB>,
    request: web::Json<CreateCampaignRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /add-camp - {}", request.camp_name);

    let result = campaign_service::create_campaign(&db, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// PATCH /update-camp/{id} - Sets only the fields present in the body
pub async fn update_campaign(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<UpdateCampaignRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PATCH /update-camp/{}", id);

    let result = campaign_service::update_campaign(&db, &id, &request).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// DELETE /delete-camp/{id}
pub async fn delete_campaign(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /delete-camp/{}", id);

    let result = campaign_service::delete_campaign(&db, &id).await?;
    Ok(HttpResponse::Ok().json(result))
}
