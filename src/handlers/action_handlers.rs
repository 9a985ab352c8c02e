use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::auth_handlers::CsrfOnly;
use crate::auth::{csrf, session::set_flash};
use crate::errors::AppError;
use crate::models::action::DashAction;

/// POST /mod/actions/{action} — placeholder for the Discord-side actions.
pub async fn run(
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let action = DashAction::from_slug(&path).ok_or(AppError::NotFound)?;

    log::info!("Dashboard action requested: {}", action.slug());
    set_flash(&session, &action.outcome());

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/mod"))
        .finish())
}
