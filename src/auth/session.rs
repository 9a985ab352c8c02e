use actix_session::{
    Session, SessionMiddleware,
    config::PersistentSession,
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use chrono::Utc;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Name of the signed + encrypted session cookie.
pub const COOKIE_NAME: &str = "mod_auth";
pub const MOD_ROLE: &str = "mod";

/// Build the cookie key from `AUTH_SECRET`, or a random one (sessions lost on restart).
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(val) if val.len() >= 64 => {
            log::info!("Using AUTH_SECRET from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("AUTH_SECRET too short ({} bytes, need 64+) — generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No AUTH_SECRET set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}

pub fn session_middleware(config: &AppConfig, key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(COOKIE_NAME.to_string())
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_path("/".to_string())
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::seconds(config.session_ttl_secs)),
        )
        .build()
}

/// Mark the session as an authenticated moderator for `ttl_secs`.
pub fn sign_in(session: &Session, ttl_secs: i64) -> Result<(), AppError> {
    let expires_at = expiry_after(Utc::now().timestamp(), ttl_secs)?;
    session.renew();
    session
        .insert("role", MOD_ROLE)
        .and_then(|_| session.insert("expires_at", expires_at))
        .map_err(|e| AppError::Session(e.to_string()))
}

/// Absolute expiry (unix seconds) for a session started at `now`.
fn expiry_after(now: i64, ttl_secs: i64) -> Result<i64, AppError> {
    now.checked_add(ttl_secs)
        .ok_or_else(|| AppError::Session(format!("session ttl {ttl_secs}s is out of range")))
}

/// True when the session carries the moderator role and has not expired.
pub fn is_authenticated(session: &Session) -> bool {
    let role = session.get::<String>("role").unwrap_or(None);
    let expires_at = session.get::<i64>("expires_at").unwrap_or(None);
    match (role.as_deref(), expires_at) {
        (Some(MOD_ROLE), Some(exp)) => exp > Utc::now().timestamp(),
        _ => false,
    }
}

pub fn set_flash(session: &Session, message: &str) {
    if let Err(e) = session.insert("flash", message) {
        log::warn!("Failed to store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_adds_ttl() {
        assert_eq!(expiry_after(1_000, 60).unwrap(), 1_060);
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        let now = Utc::now().timestamp();
        assert!(matches!(expiry_after(now, i64::MAX), Err(AppError::Session(_))));
    }
}
