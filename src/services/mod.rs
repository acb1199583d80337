pub mod auth_service;
pub mod campaign_service;
pub mod payment_gateway;
pub mod payment_service;
pub mod registration_service;
pub mod review_service;
pub mod user_service;

pub use auth_service::TokenService;
pub use payment_gateway::{PaymentGateway, StripeGateway};
