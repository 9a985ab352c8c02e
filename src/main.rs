use actix_web::{App, HttpServer, middleware, web};

use moddash::auth::{rate_limit::RateLimiter, session};
use moddash::config::AppConfig;
use moddash::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    if !config.has_password() {
        log::warn!("Neither MOD_PASSWORD nor MOD_PASSWORD_HASH is set — logins will be refused");
    }

    // Initialize database
    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;
    db::seed_role_mappings(&pool).await.map_err(std::io::Error::other)?;

    let secret_key = session::session_key(config.auth_secret.as_deref());
    let limiter = web::Data::new(RateLimiter::new());
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(session::session_middleware(&config, secret_key.clone()))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(limiter.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
