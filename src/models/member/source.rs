use std::future::Future;

use sqlx::PgPool;

use super::queries;
use super::types::{Member, StoredMember, Subscriber};
use crate::errors::AppError;

/// Somewhere members can be loaded from.
pub trait MemberSource {
    type Record: Subscriber + Clone;

    fn load(&self) -> impl Future<Output = Result<Vec<Self::Record>, AppError>> + Send;
}

/// Members persisted in the `members` table.
#[derive(Clone)]
pub struct PgMemberSource {
    pool: PgPool,
}

impl PgMemberSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MemberSource for PgMemberSource {
    type Record = StoredMember;

    async fn load(&self) -> Result<Vec<StoredMember>, AppError> {
        Ok(queries::find_all(&self.pool).await?)
    }
}

/// A fixed in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticMembers<M>(pub Vec<M>);

impl<M> MemberSource for StaticMembers<M>
where
    M: Subscriber + Clone + Send + Sync,
{
    type Record = M;

    async fn load(&self) -> Result<Vec<M>, AppError> {
        Ok(self.0.clone())
    }
}

/// Sample roster shown when nothing has been imported yet.
pub fn demo_members() -> StaticMembers<Member> {
    StaticMembers(vec![
        Member::new("Shawn", 1, "2025-01-01", "2025-08-31", true),
        Member::new("HorrorGirl", 1, "2025-01-01", "2025-09-23", true),
        Member::new("Syd", 1, "2025-01-01", "2025-12-31", true),
        Member::new("Alice", 2, "2025-06-01", "2025-09-02", false),
        Member::new("Bob", 3, "2025-07-10", "2025-09-10", false),
        Member::new("Charlie", 2, "2025-08-01", "2025-08-28", false),
    ])
}
