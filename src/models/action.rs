/// The dashboard's action buttons. None of them talk to Discord yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashAction {
    AssignMod,
    SendExpiringSoon,
    RefreshChannel,
    SyncRoles,
    RecomputeStats,
    Settings,
}

impl DashAction {
    pub const ALL: [DashAction; 6] = [
        DashAction::AssignMod,
        DashAction::SendExpiringSoon,
        DashAction::RefreshChannel,
        DashAction::SyncRoles,
        DashAction::RecomputeStats,
        DashAction::Settings,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            DashAction::AssignMod => "assign-mod",
            DashAction::SendExpiringSoon => "send-expiring-soon",
            DashAction::RefreshChannel => "refresh-channel",
            DashAction::SyncRoles => "sync-roles",
            DashAction::RecomputeStats => "recompute-stats",
            DashAction::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashAction::AssignMod => "Assign Mod",
            DashAction::SendExpiringSoon => "Send Expiring Soon",
            DashAction::RefreshChannel => "Refresh Channel",
            DashAction::SyncRoles => "Sync Roles",
            DashAction::RecomputeStats => "Recompute Stats",
            DashAction::Settings => "Settings",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DashAction::AssignMod => "➕",
            DashAction::SendExpiringSoon => "✉",
            DashAction::RefreshChannel => "⟳",
            DashAction::SyncRoles => "⇄",
            DashAction::RecomputeStats => "⚠",
            DashAction::Settings => "⚙",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.slug() == slug)
    }

    /// Flash message shown after the button is pressed.
    pub fn outcome(&self) -> String {
        match self {
            // the summary is rebuilt on every page load
            DashAction::RecomputeStats => "Stats recomputed.".to_string(),
            other => format!("{} is not implemented yet.", other.label()),
        }
    }
}
