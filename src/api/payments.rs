use crate::{
    database::MongoDB,
    middleware::ensure_own_email,
    models::{PaymentIntentRequest, PaymentIntentResponse, PaymentRecorded, RecordPaymentRequest},
    services::{auth_service::Claims, payment_gateway::PaymentGateway, payment_service},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

/// POST /payment-intent - Creates a card payment intent for the camp's fee
#[utoipa::path(
    post,
    path = "/payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret for the checkout form", body = PaymentIntentResponse),
        (status = 400, description = "Campaign not found"),
        (status = 502, description = "Payment provider rejected the request")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment_intent(
    db: web::Data<MongoDB>,
    gateway: web::Data<dyn PaymentGateway>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("💳 POST /payment-intent - camp {}", request.camp_id);

    let intent =
        payment_service::create_payment_intent(&db, gateway.get_ref(), &request.camp_id).await?;
    Ok(HttpResponse::Ok().json(intent))
}

/// POST /payments - Records a settled payment and marks the registration paid
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment stored", body = PaymentRecorded),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Transaction already recorded")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_payment(
    db: web::Data<MongoDB>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "💰 POST /payments - {} for registration {}",
        request.transaction_id,
        request.participant_id
    );

    let result = payment_service::record_payment(&db, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /payments/{email} - Payment history joined with registration and camp
pub async fn payment_history(
    claims: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    ensure_own_email(&claims, &email)?;
    log::info!("📋 GET /payments/{}", email);

    let rows = payment_service::payment_history(&db, &email).await?;
    Ok(HttpResponse::Ok().json(rows))
}
