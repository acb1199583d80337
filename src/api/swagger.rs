use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CureCamp API",
        version = "1.0.0",
        description = "Backend for medical camp listings, participant registration, reviews and camp fee payments.\n\n**Authentication:** write routes and participant dashboards need a bearer token from `POST /jwt`."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::users::create_user,
        crate::api::campaigns::popular_campaigns,
        crate::api::campaigns::camp_details,
        crate::api::registrations::register,
        crate::api::payments::create_payment_intent,
        crate::api::payments::record_payment,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::services::auth_service::TokenResponse,
            crate::models::User,
            crate::models::CreateUserRequest,
            crate::models::UpdateUserRequest,
            crate::models::CreateUserResponse,
            crate::models::Campaign,
            crate::models::CreateCampaignRequest,
            crate::models::UpdateCampaignRequest,
            crate::models::Registration,
            crate::models::RegisterRequest,
            crate::models::UpdateConfirmationRequest,
            crate::models::PaymentStatus,
            crate::models::ConfirmationStatus,
            crate::models::PaymentIntentRequest,
            crate::models::PaymentIntentResponse,
            crate::models::RecordPaymentRequest,
            crate::models::PaymentRecorded,
            crate::models::InsertedResponse,
            crate::models::InsertedManyResponse,
            crate::models::UpdatedResponse,
            crate::models::DeletedResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability."),
        (name = "Users", description = "Participant profiles."),
        (name = "Camps", description = "Medical camp catalog."),
        (name = "Registrations", description = "Participant enrollment and confirmation."),
        (name = "Payments", description = "Camp fee checkout and payment history."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build(),
                ),
            );
        }
    }
}
