//! HTTP handlers and route configuration.

mod admin;
mod comments;
mod health;
mod posts;


use actix_web::{HttpRequest, HttpResponse, web};

use crate::middleware::error::{
    AppError, AppResult, json_error_handler, path_error_handler, query_error_handler,
};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Configure all application routes.
///
/// The state's write limiter guards the unauthenticated write endpoints.
/// Every resource answers unknown methods with a JSON 405, and unknown
/// paths get a JSON 404.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let write_limit = || RateLimitMiddleware::new(state.write_limiter.clone(), state.client_key);

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(resource("/health/").route(web::get().to(health::health_check)))
        // Public routes
        .service(resource("/posts/").route(web::get().to(posts::list_published)))
        .service(
            resource("/posts/create/").route(web::post().to(posts::create).wrap(write_limit())),
        )
        .service(resource("/posts/{id}/").route(web::get().to(posts::detail)))
        .service(
            resource("/comments/create/")
                .route(web::post().to(comments::create).wrap(write_limit())),
        )
        // Admin routes
        .service(
            web::scope("/admin")
                .service(resource("/posts/").route(web::get().to(admin::list_posts)))
                .service(
                    resource("/posts/{id}/publish/").route(web::post().to(admin::publish_post)),
                )
                .service(resource("/posts/{id}/").route(web::delete().to(admin::delete_post)))
                .service(
                    resource("/comments/{id}/").route(web::delete().to(admin::delete_comment)),
                ),
        )
        .default_service(web::to(no_route));
}

fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

async fn no_route(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("no resource at {}", req.path())))
}

async fn method_not_allowed(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed(format!(
        "method {} not allowed on {}",
        req.method(),
        req.path()
    )))
}
