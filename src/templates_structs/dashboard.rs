use askama::Template;
use chrono::{DateTime, Utc};

use super::PageContext;
use crate::models::action::DashAction;
use crate::models::member::{Subscriber, format_date};
use crate::models::role_mapping::RoleMapping;
use crate::status::{self, StatusWindows};

/// One table row, already formatted for display.
#[derive(Debug, Clone)]
pub struct MemberRow {
    pub username: String,
    pub tier: i32,
    pub standing: String,
    pub start: String,
    pub end: String,
}

impl MemberRow {
    pub fn new<M: Subscriber>(member: &M, now: DateTime<Utc>, windows: StatusWindows) -> Self {
        let standing = status::standing_of(member, now, windows)
            .map(|s| s.label())
            .unwrap_or("Unknown");
        Self {
            username: member.username().to_string(),
            tier: member.tier(),
            standing: standing.to_string(),
            start: format_date(member.starts_at()),
            end: format_date(member.ends_at()),
        }
    }
}

pub struct ActionButton {
    pub slug: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub active: usize,
    pub expiring: usize,
    pub lapsed: usize,
    pub member_count: usize,
    pub moderators: Vec<MemberRow>,
    pub expiring_soon: Vec<MemberRow>,
    pub role_mappings: Vec<RoleMapping>,
    pub actions: Vec<ActionButton>,
    pub windows: StatusWindows,
    /// True when showing the built-in sample roster.
    pub demo: bool,
}

impl DashboardTemplate {
    pub fn build<M: Subscriber + Clone>(
        ctx: PageContext,
        members: &[M],
        now: DateTime<Utc>,
        windows: StatusWindows,
        role_mappings: Vec<RoleMapping>,
        demo: bool,
    ) -> Self {
        let summary = status::classify(members, now, windows);
        let rows = |list: &[M]| -> Vec<MemberRow> {
            list.iter().map(|m| MemberRow::new(m, now, windows)).collect()
        };
        Self {
            ctx,
            active: summary.active,
            expiring: summary.expiring,
            lapsed: summary.lapsed,
            member_count: members.len(),
            moderators: rows(&summary.moderators),
            expiring_soon: rows(&summary.expiring_soon),
            role_mappings,
            actions: DashAction::ALL
                .iter()
                .map(|a| ActionButton { slug: a.slug(), label: a.label(), icon: a.icon() })
                .collect(),
            windows,
            demo,
        }
    }
}
