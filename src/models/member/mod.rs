pub mod import;
pub mod queries;
pub mod source;
pub mod types;

pub use queries::*;
pub use source::{MemberSource, PgMemberSource, StaticMembers, demo_members};
pub use types::*;
