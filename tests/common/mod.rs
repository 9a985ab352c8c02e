//! Shared test infrastructure for the HTTP and database tests.
//!
//! - `test_app!(config)` / `test_app!(config, pool)` build an initialised actix service
//!   with the production routes and session middleware.
//! - `sign_in!(app)` runs the login form flow and returns the authenticated session cookie.

#![allow(dead_code, unused_macros, unused_imports)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use chrono::{Duration, Utc};
use regex::Regex;

use moddash::auth::session::COOKIE_NAME;
use moddash::config::AppConfig;
use moddash::models::member::Member;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const MOD_PASS: &str = "correct horse battery";

pub fn test_config() -> AppConfig {
    AppConfig::with_password(MOD_PASS)
}

// ============================================================================
// APP SETUP
// ============================================================================

macro_rules! test_app {
    ($config:expr) => {{
        let config: moddash::config::AppConfig = $config;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(moddash::auth::session::session_middleware(
                    &config,
                    actix_web::cookie::Key::generate(),
                ))
                .app_data(actix_web::web::Data::new(config.clone()))
                .app_data(actix_web::web::Data::new(
                    moddash::auth::rate_limit::RateLimiter::new(),
                ))
                .configure(moddash::routes::configure),
        )
        .await
    }};
    ($config:expr, $pool:expr) => {{
        let config: moddash::config::AppConfig = $config;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(moddash::auth::session::session_middleware(
                    &config,
                    actix_web::cookie::Key::generate(),
                ))
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new(config.clone()))
                .app_data(actix_web::web::Data::new(
                    moddash::auth::rate_limit::RateLimiter::new(),
                ))
                .configure(moddash::routes::configure),
        )
        .await
    }};
}
pub(crate) use test_app;

/// Fetch the login page, then submit the shared password. Evaluates to the session cookie.
macro_rules! sign_in {
    ($app:expr) => {{
        let (cookie, token) = common::open_login_page!($app);
        let resp = actix_web::test::call_service(
            &$app,
            common::login_request(&cookie, &token, common::MOD_PASS, "/mod").to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        common::session_cookie(&resp).expect("login should refresh the session cookie")
    }};
}
pub(crate) use sign_in;

/// GET /mod/login. Evaluates to `(session cookie, csrf token)`.
macro_rules! open_login_page {
    ($app:expr) => {{
        let resp = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get().uri("/mod/login").to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let cookie = common::session_cookie(&resp).expect("login page should set a session cookie");
        let body = actix_web::test::read_body(resp).await;
        let token = common::extract_csrf(std::str::from_utf8(&body).unwrap());
        (cookie, token)
    }};
}
pub(crate) use open_login_page;

// ============================================================================
// REQUEST / RESPONSE HELPERS
// ============================================================================

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == COOKIE_NAME)
        .map(|c| c.into_owned())
}

pub fn extract_csrf(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).unwrap();
    re.captures(html)
        .map(|c| c[1].to_string())
        .expect("page should embed a csrf token")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn login_request(
    cookie: &Cookie<'static>,
    token: &str,
    password: &str,
    next: &str,
) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri("/mod/login")
        .cookie(cookie.clone())
        .set_form([("csrf_token", token), ("password", password), ("next", next)])
}

pub fn csrf_post(uri: &str, cookie: &Cookie<'static>, token: &str) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_form([("csrf_token", token)])
}

// ============================================================================
// DATA HELPERS
// ============================================================================

/// `YYYY-MM-DD` for today plus `days` (negative for the past).
pub fn day_offset(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

pub fn member_ending_in(name: &str, days: i64, is_moderator: bool) -> Member {
    Member::new(name, 1, &day_offset(-90), &day_offset(days), is_moderator)
}
