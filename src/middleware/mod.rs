pub mod auth;

pub use auth::{ensure_own_email, AuthMiddleware};
