use crate::{
    services::auth_service::{TokenResponse, TokenService},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use serde_json::Value;

/// POST /jwt - Issues a bearer token whose claims are the request body
pub async fn issue_token(
    tokens: web::Data<TokenService>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    log::info!(
        "🔑 POST /jwt - Issuing token for {}",
        payload.get("email").and_then(Value::as_str).unwrap_or("<no email>")
    );

    let token = tokens.issue(payload)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
