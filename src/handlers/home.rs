use actix_web::HttpResponse;

use crate::errors::{AppError, render};
use crate::templates_structs::{APP_NAME, HomeTemplate};

/// GET / — splash page linking to the login form.
pub async fn index() -> Result<HttpResponse, AppError> {
    render(HomeTemplate { app_name: APP_NAME.to_string() })
}
