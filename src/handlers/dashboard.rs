use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::member::{self, Member, MemberSource, PgMemberSource};
use crate::models::role_mapping;
use crate::status;
use crate::templates_structs::{DashboardTemplate, PageContext};

/// GET /mod — stat cards, shortlists and role mappings.
pub async fn index(
    pool: web::Data<PgPool>,
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session);
    let now = Utc::now();
    let role_mappings = role_mapping::find_all(&pool).await?;

    let stored = PgMemberSource::new(pool.get_ref().clone()).load().await?;
    let tmpl = if stored.is_empty() && config.demo_fallback {
        let demo = member::demo_members().load().await?;
        DashboardTemplate::build(ctx, &demo, now, config.windows, role_mappings, true)
    } else {
        DashboardTemplate::build(ctx, &stored, now, config.windows, role_mappings, false)
    };
    render(tmpl)
}

/// GET /mod/api/summary — summary of the stored members.
pub async fn summary(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let members = PgMemberSource::new(pool.get_ref().clone()).load().await?;
    let summary = status::classify(&members, Utc::now(), config.windows);
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /mod/api/summary — summary of a posted member list (string dates).
pub async fn summarize(
    config: web::Data<AppConfig>,
    body: web::Json<Vec<Member>>,
) -> Result<HttpResponse, AppError> {
    let summary = status::classify(body.as_slice(), Utc::now(), config.windows);
    Ok(HttpResponse::Ok().json(summary))
}
