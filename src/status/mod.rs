//! Membership status classification.
//!
//! Buckets members into active / expiring / lapsed relative to a time anchor.
//! Expiring members are also counted as active. The grace window only moves
//! the lapsed boundary into the past; it never touches the expiring window.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::member::Subscriber;

/// Maximum length of the expiring-soon shortlist.
pub const SHORTLIST_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWindows {
    /// Members ending within this many days from now are "expiring".
    pub expiring_days: i64,
    /// Members are only "lapsed" once their end date is more than this many days ago.
    pub grace_days: i64,
}

impl Default for StatusWindows {
    fn default() -> Self {
        Self { expiring_days: 14, grace_days: 3 }
    }
}

impl StatusWindows {
    /// `(soon_cutoff, grace_cutoff)` for the given anchor.
    /// Windows too large for chrono saturate at the ends of its range.
    pub fn cutoffs(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let soon = Duration::try_days(self.expiring_days)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let grace = Duration::try_days(self.grace_days)
            .and_then(|d| now.checked_sub_signed(d))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        (soon, grace)
    }
}

/// Where a single end date falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    Active,
    Expiring,
    Lapsed,
}

impl Standing {
    pub fn label(&self) -> &'static str {
        match self {
            Standing::Active => "Active",
            Standing::Expiring => "Expiring",
            Standing::Lapsed => "Lapsed",
        }
    }
}

pub fn standing(end: DateTime<Utc>, now: DateTime<Utc>, windows: StatusWindows) -> Standing {
    let (soon_cutoff, grace_cutoff) = windows.cutoffs(now);
    if end < grace_cutoff {
        Standing::Lapsed
    } else if end >= now && end <= soon_cutoff {
        Standing::Expiring
    } else {
        Standing::Active
    }
}

/// `None` when the member's end date is unparseable.
pub fn standing_of<M: Subscriber>(member: &M, now: DateTime<Utc>, windows: StatusWindows) -> Option<Standing> {
    member.ends_at().map(|end| standing(end, now, windows))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary<M> {
    pub active: usize,
    pub expiring: usize,
    pub lapsed: usize,
    /// Sorted by end date, capped at [`SHORTLIST_CAP`].
    pub expiring_soon: Vec<M>,
    /// Every moderator in input order, whatever their standing.
    pub moderators: Vec<M>,
}

impl<M> Default for StatusSummary<M> {
    fn default() -> Self {
        Self {
            active: 0,
            expiring: 0,
            lapsed: 0,
            expiring_soon: Vec::new(),
            moderators: Vec::new(),
        }
    }
}

pub fn classify<M>(members: &[M], now: DateTime<Utc>, windows: StatusWindows) -> StatusSummary<M>
where
    M: Subscriber + Clone,
{
    let mut summary = StatusSummary::default();
    let mut soon: Vec<(DateTime<Utc>, &M)> = Vec::new();

    for member in members {
        if member.is_moderator() {
            summary.moderators.push(member.clone());
        }
        let Some(end) = member.ends_at() else {
            continue;
        };
        match standing(end, now, windows) {
            Standing::Lapsed => summary.lapsed += 1,
            Standing::Expiring => {
                summary.active += 1;
                summary.expiring += 1;
                soon.push((end, member));
            }
            Standing::Active => summary.active += 1,
        }
    }

    // stable: equal end dates keep input order
    soon.sort_by_key(|(end, _)| *end);
    summary.expiring_soon = soon
        .into_iter()
        .take(SHORTLIST_CAP)
        .map(|(_, m)| m.clone())
        .collect();
    summary
}
