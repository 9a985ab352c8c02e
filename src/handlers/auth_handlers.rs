use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::middleware::safe_next;
use crate::auth::{csrf, password, rate_limit::RateLimiter, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::templates_structs::{APP_NAME, LoginTemplate};

/// Fixed pause before every password check to slow down guessing.
const LOGIN_DELAY: Duration = Duration::from_millis(150);

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
    pub csrf_token: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(session: &Session, error: Option<&str>, next: &str) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error: error.map(str::to_string),
        app_name: APP_NAME.to_string(),
        csrf_token: csrf::get_or_create_token(session),
        next: next.to_string(),
    };
    render(tmpl)
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

pub async fn login_page(
    session: Session,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    let next = safe_next(query.next.as_deref());
    // Already signed in: skip the form
    if session::is_authenticated(&session) {
        return Ok(see_other(next));
    }
    login_form(&session, None, next)
}

pub async fn login_submit(
    req: HttpRequest,
    session: Session,
    form: web::Form<LoginForm>,
    config: web::Data<AppConfig>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let next = safe_next(form.next.as_deref());

    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failed attempts");
        return login_form(
            &session,
            Some("Too many failed login attempts. Please try again later."),
            next,
        );
    }

    if !config.has_password() {
        log::error!("Login attempted but neither MOD_PASSWORD nor MOD_PASSWORD_HASH is set");
        return login_form(
            &session,
            Some("No password configured. Set MOD_PASSWORD or MOD_PASSWORD_HASH."),
            next,
        );
    }

    tokio::time::sleep(LOGIN_DELAY).await;

    if password::check_shared_password(&config, &form.password)? {
        limiter.clear(ip);
        session::sign_in(&session, config.session_ttl_secs)?;
        log::info!("Moderator signed in from {ip}");
        Ok(see_other(next))
    } else {
        limiter.record_failure(ip);
        log::warn!("Failed moderator login from {ip}");
        login_form(&session, Some("Invalid password."), next)
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(see_other("/mod/login"))
}
