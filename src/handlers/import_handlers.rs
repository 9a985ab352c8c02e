use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, session::set_flash};
use crate::errors::AppError;
use crate::models::member::import::{self, ImportError};

const SPREADSHEET_EXTENSIONS: [&str; 4] = [".xlsx", ".xlsb", ".xlsm", ".xls"];

/// The import card reads the chosen file in the browser and posts its text.
#[derive(Deserialize)]
pub struct ImportForm {
    pub csrf_token: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_name: String,
}

/// POST /mod/import — replace the stored member list with an uploaded CSV.
pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<ImportForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let file_name = form.file_name.to_lowercase();
    if SPREADSHEET_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext)) {
        set_flash(&session, "Only CSV files are supported. Export the sheet as CSV and try again.");
    } else {
        match import::import_csv(&pool, &form.content).await {
            Ok(report) => {
                log::info!(
                    "Imported {} members from '{}' ({} rows skipped)",
                    report.imported,
                    form.file_name,
                    report.skipped.len()
                );
                set_flash(&session, &report.summary());
            }
            Err(ImportError::Db(e)) => return Err(AppError::Db(e)),
            Err(e) => {
                log::warn!("Import of '{}' rejected: {e}", form.file_name);
                set_flash(&session, &e.to_string());
            }
        }
    }

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/mod"))
        .finish())
}
