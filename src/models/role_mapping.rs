use serde::Serialize;
use sqlx::PgPool;

/// Maps a subscription plan (and its tier) to the Discord role it grants.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoleMapping {
    pub plan: String,
    pub tier: i32,
    pub discord_role: String,
}

impl RoleMapping {
    pub fn new(plan: &str, tier: i32, discord_role: &str) -> Self {
        Self {
            plan: plan.to_string(),
            tier,
            discord_role: discord_role.to_string(),
        }
    }
}

/// Plan mappings seeded into an empty database.
pub fn defaults() -> Vec<RoleMapping> {
    vec![
        RoleMapping::new("Tiktok - 1 month", 1, "NEWB"),
        RoleMapping::new("Tiktok - 2 month", 2, "Krashista"),
        RoleMapping::new("Tiktok - 3 month", 3, "Krashout Lite"),
        RoleMapping::new("Tiktok - 6 month", 4, "Krazy Krashout"),
        RoleMapping::new("Tiktok - 12 month", 5, "OG Krashout"),
    ]
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<RoleMapping>, sqlx::Error> {
    sqlx::query_as::<_, RoleMapping>(
        "SELECT plan, tier, discord_role FROM role_mappings ORDER BY tier ASC, plan ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM role_mappings")
        .fetch_one(pool)
        .await
}

/// Insert or update the mapping for a plan.
pub async fn upsert(pool: &PgPool, mapping: &RoleMapping) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO role_mappings (plan, tier, discord_role) VALUES ($1, $2, $3) \
         ON CONFLICT (plan) DO UPDATE SET tier = EXCLUDED.tier, discord_role = EXCLUDED.discord_role",
    )
    .bind(&mapping.plan)
    .bind(mapping.tier)
    .bind(&mapping.discord_role)
    .execute(pool)
    .await?;
    Ok(())
}
