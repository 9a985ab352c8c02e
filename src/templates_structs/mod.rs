// Template context structures for Askama templates.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::take_flash;

mod common;
mod dashboard;

pub use self::common::{HomeTemplate, LoginTemplate};
pub use self::dashboard::{ActionButton, DashboardTemplate, MemberRow};

pub const APP_NAME: &str = "Mod Dashboard";

/// Common context shared by all authenticated pages.
pub struct PageContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
}

impl PageContext {
    pub fn build(session: &Session) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
        }
    }
}
