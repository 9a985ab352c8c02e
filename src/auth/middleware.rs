use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use super::session::is_authenticated;

/// Login page URL that returns to `path` afterwards.
pub fn login_redirect_target(path: &str) -> String {
    match serde_urlencoded::to_string([("next", path)]) {
        Ok(query) => format!("/mod/login?{query}"),
        Err(_) => "/mod/login".to_string(),
    }
}

/// Only same-site dashboard paths are accepted as post-login destinations.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(p) if (p == "/mod" || p.starts_with("/mod/")) && !p.starts_with("/mod/login") => p,
        _ => "/mod",
    }
}

/// Middleware function that checks for an authenticated moderator session.
/// Redirects to /mod/login?next=<path> otherwise.
pub async fn require_mod(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();

    if !is_authenticated(&session) {
        let location = login_redirect_target(req.path());
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", location))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
