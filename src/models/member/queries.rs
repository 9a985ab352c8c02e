use sqlx::PgPool;

use super::types::{NewMember, StoredMember};

const SELECT_MEMBER: &str = "\
    SELECT id, username, tier, start_at, end_at, is_moderator \
    FROM members";

/// All members, soonest end date first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<StoredMember>, sqlx::Error> {
    sqlx::query_as::<_, StoredMember>(&format!("{SELECT_MEMBER} ORDER BY end_at ASC, id ASC"))
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(pool)
        .await
}

pub async fn insert(pool: &PgPool, member: &NewMember) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO members (username, tier, start_at, end_at, is_moderator) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&member.username)
    .bind(member.tier)
    .bind(member.start_at)
    .bind(member.end_at)
    .bind(member.is_moderator)
    .fetch_one(pool)
    .await
}

/// Replace the whole member list in one transaction. Returns the number of rows inserted.
pub async fn replace_all(pool: &PgPool, members: &[NewMember]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM members").execute(&mut *tx).await?;

    let mut inserted = 0;
    for m in members {
        inserted += sqlx::query(
            "INSERT INTO members (username, tier, start_at, end_at, is_moderator) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&m.username)
        .bind(m.tier)
        .bind(m.start_at)
        .bind(m.end_at)
        .bind(m.is_moderator)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}
