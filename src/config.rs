//! Runtime configuration read from environment variables (and `.env` via dotenvy).

use crate::errors::AppError;
use crate::status::StatusWindows;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_TTL_SECS: i64 = 60 * 60 * 24 * 30;
/// About a century; keeps cutoff arithmetic well inside chrono's range.
const MAX_WINDOW_DAYS: i64 = 36_500;
/// Ten years.
const MAX_TTL_SECS: i64 = 60 * 60 * 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Key material for the session cookie; a random key is used when absent.
    pub auth_secret: Option<String>,
    /// Shared plain password. Takes precedence over `mod_password_hash`.
    pub mod_password: Option<String>,
    /// Argon2 PHC string.
    pub mod_password_hash: Option<String>,
    pub session_ttl_secs: i64,
    pub cookie_secure: bool,
    pub windows: StatusWindows,
    pub demo_fallback: bool,
}

/// Trim and strip one pair of surrounding quotes. Empty values count as unset.
fn clean(raw: Option<String>) -> Option<String> {
    let v = raw?;
    let v = v.trim();
    let v = v.strip_prefix(['"', '\'']).unwrap_or(v);
    let v = v.strip_suffix(['"', '\'']).unwrap_or(v);
    if v.is_empty() { None } else { Some(v.to_string()) }
}

fn parse_num(name: &str, raw: Option<String>, default: i64, max: i64) -> Result<i64, AppError> {
    match raw {
        None => Ok(default),
        Some(v) => match v.parse::<i64>() {
            Ok(n) if (0..=max).contains(&n) => Ok(n),
            _ => Err(AppError::Config(format!("{name} must be an integer between 0 and {max}, got '{v}'"))),
        },
    }
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::to_lowercase).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| clean(lookup(key));

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
        let defaults = StatusWindows::default();

        let ttl = parse_num("AUTH_TTL_SECONDS", get("AUTH_TTL_SECONDS"), DEFAULT_TTL_SECS, MAX_TTL_SECS)?;
        if ttl == 0 {
            return Err(AppError::Config("AUTH_TTL_SECONDS must be positive".to_string()));
        }

        Ok(AppConfig {
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            auth_secret: get("AUTH_SECRET"),
            mod_password: get("MOD_PASSWORD"),
            mod_password_hash: get("MOD_PASSWORD_HASH"),
            session_ttl_secs: ttl,
            cookie_secure: get("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
            windows: StatusWindows {
                expiring_days: parse_num(
                    "EXPIRING_WINDOW_DAYS",
                    get("EXPIRING_WINDOW_DAYS"),
                    defaults.expiring_days,
                    MAX_WINDOW_DAYS,
                )?,
                grace_days: parse_num(
                    "GRACE_WINDOW_DAYS",
                    get("GRACE_WINDOW_DAYS"),
                    defaults.grace_days,
                    MAX_WINDOW_DAYS,
                )?,
            },
            demo_fallback: parse_flag(get("DEMO_FALLBACK"), true),
        })
    }

    /// Config for tests and tooling: no database, the given plain password.
    pub fn with_password(password: &str) -> Self {
        AppConfig {
            database_url: String::new(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            auth_secret: None,
            mod_password: Some(password.to_string()),
            mod_password_hash: None,
            session_ttl_secs: DEFAULT_TTL_SECS,
            cookie_secure: false,
            windows: StatusWindows::default(),
            demo_fallback: true,
        }
    }

    pub fn has_password(&self) -> bool {
        self.mod_password.is_some() || self.mod_password_hash.is_some()
    }
}
