mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::{PaymentGateway, StripeGateway, TokenService};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    log::info!("🚀 Starting CureCamp Service...");
    log::info!("📊 Database: {}", config.database_name);

    let db = database::MongoDB::new(&config.mongodb_uri, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    let gateway = StripeGateway::new(&config.stripe_api_base, &config.stripe_secret_key)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let gateway: Arc<dyn PaymentGateway> = Arc::new(gateway);

    let db_data = web::Data::new(db.clone());
    let tokens = web::Data::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_secs));
    let gateway_data: web::Data<dyn PaymentGateway> = web::Data::from(gateway);
    let origins = config.allowed_origins.clone();

    log::info!("🌐 Server starting on {}", config.bind_addr());
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", config.bind_addr());

    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(db_data.clone())
            .app_data(tokens.clone())
            .app_data(gateway_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(api::configure)
    })
    .bind(config.bind_addr())?
    .run()
    .await?;

    log::info!("🛑 Server stopped, closing MongoDB connections");
    db.shutdown().await;

    Ok(())
}
