pub mod auth;
pub mod campaigns;
pub mod health;
pub mod payments;
pub mod registrations;
pub mod reviews;
pub mod swagger;
pub mod users;

use crate::{middleware::AuthMiddleware, utils::AppError};
use actix_web::{guard, web};

/// Registers every route. Protected resources are wrapped individually so that
/// public reads can share a path with an authenticated write.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("⚠️  Rejected JSON body: {}", err);
        AppError::InvalidRequest(err.to_string()).into()
    }))
    // Public
    .route("/", web::get().to(health::index))
    .route("/health", web::get().to(health::health_check))
    .route("/jwt", web::post().to(auth::issue_token))
    .route("/users", web::post().to(users::create_user))
    .route("/camp-details/{id}", web::get().to(campaigns::camp_details))
    .route("/popular-campain", web::get().to(campaigns::popular_campaigns))
    .route("/campains", web::get().to(campaigns::list_campaigns))
    .route("/campains/{page}", web::get().to(campaigns::list_campaigns_page))
    .service(
        web::resource("/reviews")
            .guard(guard::Get())
            .route(web::get().to(reviews::list_reviews)),
    )
    // Bearer token required
    .service(
        web::resource("/reviews")
            .guard(guard::Post())
            .wrap(AuthMiddleware)
            .route(web::post().to(reviews::add_review)),
    )
    .service(
        web::resource("/add-db")
            .wrap(AuthMiddleware)
            .route(web::post().to(reviews::import_reviews)),
    )
    .service(
        web::resource("/users/{email}")
            .wrap(AuthMiddleware)
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user)),
    )
    .service(
        web::resource("/add-camp")
            .wrap(AuthMiddleware)
            .route(web::post().to(campaigns::add_campaign)),
    )
    .service(
        web::resource("/update-camp/{id}")
            .wrap(AuthMiddleware)
            .route(web::patch().to(campaigns::update_campaign)),
    )
    .service(
        web::resource("/delete-camp/{id}")
            .wrap(AuthMiddleware)
            .route(web::delete().to(campaigns::delete_campaign)),
    )
    .service(
        web::resource("/register-campain")
            .wrap(AuthMiddleware)
            .route(web::post().to(registrations::register)),
    )
    .service(
        web::resource("/delete-reg-camp/{id}")
            .wrap(AuthMiddleware)
            .route(web::delete().to(registrations::delete_registration)),
    )
    .service(
        web::resource("/manage-registered-camps")
            .wrap(AuthMiddleware)
            .route(web::get().to(registrations::manage_registrations)),
    )
    .service(
        web::resource("/manage-registered-camps-pagination/{page}")
            .wrap(AuthMiddleware)
            .route(web::get().to(registrations::manage_registrations_page)),
    )
    .service(
        web::resource("/registered-camps/{email}")
            .wrap(AuthMiddleware)
            .route(web::get().to(registrations::registered_camps)),
    )
    .service(
        web::resource("/analytics-registered-camps/{email}")
            .wrap(AuthMiddleware)
            .route(web::get().to(registrations::registration_analytics)),
    )
    .service(
        web::resource("/update-confirmation-status/{id}")
            .wrap(AuthMiddleware)
            .route(web::patch().to(registrations::update_confirmation_status)),
    )
    .service(
        web::resource("/payment-intent")
            .wrap(AuthMiddleware)
            .route(web::post().to(payments::create_payment_intent)),
    )
    .service(
        web::resource("/payments")
            .wrap(AuthMiddleware)
            .route(web::post().to(payments::record_payment)),
    )
    .service(
        web::resource("/payments/{email}")
            .wrap(AuthMiddleware)
            .route(web::get().to(payments::payment_history)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth_service::TokenService;
    use crate::database::detached_db;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use serde_json::json;

    fn tokens() -> web::Data<TokenService> {
        web::Data::new(TokenService::new("api-test-secret", 3600))
    }

    #[actix_web::test]
    async fn root_reports_liveness() {
        let app = actix_test::init_service(App::new().app_data(tokens()).configure(configure)).await;

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        assert_eq!(body, "CureCamp server is running");
    }

    #[actix_web::test]
    async fn issued_token_carries_payload() {
        let tokens = tokens();
        let app = actix_test::init_service(App::new().app_data(tokens.clone()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/jwt")
            .set_json(json!({ "email": "nadia@example.com" }))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        let claims = tokens.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.email(), Some("nadia@example.com"));
    }

    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let app = actix_test::init_service(App::new().app_data(tokens()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/jwt")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn protected_routes_require_a_token() {
        let app = actix_test::init_service(App::new().app_data(tokens()).configure(configure)).await;

        let requests = [
            actix_test::TestRequest::post().uri("/reviews"),
            actix_test::TestRequest::post().uri("/add-db"),
            actix_test::TestRequest::get().uri("/users/a@b.com"),
            actix_test::TestRequest::put().uri("/users/a@b.com"),
            actix_test::TestRequest::post().uri("/add-camp"),
            actix_test::TestRequest::patch().uri("/update-camp/abc"),
            actix_test::TestRequest::delete().uri("/delete-camp/abc"),
            actix_test::TestRequest::post().uri("/register-campain"),
            actix_test::TestRequest::delete().uri("/delete-reg-camp/abc"),
            actix_test::TestRequest::get().uri("/manage-registered-camps"),
            actix_test::TestRequest::get().uri("/manage-registered-camps-pagination/1"),
            actix_test::TestRequest::get().uri("/registered-camps/a@b.com"),
            actix_test::TestRequest::get().uri("/analytics-registered-camps/a@b.com"),
            actix_test::TestRequest::patch().uri("/update-confirmation-status/abc"),
            actix_test::TestRequest::post().uri("/payment-intent"),
            actix_test::TestRequest::post().uri("/payments"),
            actix_test::TestRequest::get().uri("/payments/a@b.com"),
        ];

        for req in requests {
            let req = req.to_request();
            let path = req.uri().to_string();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", path);
        }
    }

    #[actix_web::test]
    async fn email_scoped_routes_reject_other_users() {
        let tokens = tokens();
        let token = tokens.issue(json!({ "email": "a@b.com" })).unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(tokens)
                .app_data(web::Data::new(detached_db().await))
                .configure(configure),
        )
        .await;

        let requests = [
            actix_test::TestRequest::get().uri("/users/c@d.com"),
            actix_test::TestRequest::put()
                .uri("/users/c@d.com")
                .set_json(json!({ "name": "Mallory" })),
            actix_test::TestRequest::get().uri("/registered-camps/c@d.com"),
            actix_test::TestRequest::get().uri("/analytics-registered-camps/c@d.com"),
            actix_test::TestRequest::get().uri("/payments/c@d.com"),
        ];

        for req in requests {
            let req = req
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();
            let path = req.uri().to_string();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);

            let body: serde_json::Value = actix_test::read_body_json(res).await;
            assert_eq!(body, json!({ "message": "Forbidden access" }));
        }
    }

    #[actix_web::test]
    async fn huge_page_number_is_a_bad_request() {
        let app = actix_test::init_service(
            App::new()
                .app_data(tokens())
                .app_data(web::Data::new(detached_db().await))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/campains/9223372036854775807")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
