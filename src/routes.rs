use actix_web::{HttpResponse, middleware::from_fn, web};

use crate::auth::middleware::require_mod;
use crate::handlers;

/// Upper bound for form posts; imports carry the whole CSV file.
const FORM_LIMIT: usize = 2 * 1024 * 1024;

/// Register every route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(FORM_LIMIT))
        // Static files
        .service(actix_files::Files::new("/static", "./static"))
        // Public routes
        .route("/", web::get().to(handlers::home::index))
        .route("/mod/login", web::get().to(handlers::auth_handlers::login_page))
        .route("/mod/login", web::post().to(handlers::auth_handlers::login_submit))
        // Protected routes
        .service(
            web::scope("/mod")
                .wrap(from_fn(require_mod))
                .route("", web::get().to(handlers::dashboard::index))
                .route("/", web::get().to(handlers::dashboard::index))
                .route("/logout", web::post().to(handlers::auth_handlers::logout))
                .route("/import", web::post().to(handlers::import_handlers::submit))
                .route("/actions/{action}", web::post().to(handlers::action_handlers::run))
                .route("/api/summary", web::get().to(handlers::dashboard::summary))
                .route("/api/summary", web::post().to(handlers::dashboard::summarize)),
        )
        // Default 404 handler (must be registered last)
        .default_service(web::to(|| async {
            let html = include_str!("../templates/errors/404.html");
            HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(html)
        }));
}
