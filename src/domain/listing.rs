use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    #[default]
    Approved,
    ApprovalPending,
    ApprovalRejected,
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::ApprovalPending => "approval_pending",
            Self::ApprovalRejected => "approval_rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(Self::Approved),
            "approval_pending" => Some(Self::ApprovalPending),
            "approval_rejected" => Some(Self::ApprovalRejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub author_id: String,
    pub state: ApprovalState,
    pub open: bool,
    pub valid_until: Option<NaiveDateTime>,
}

/// Status shown in listing tables and used as a search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Open,
    Closed,
    Expired,
    ApprovalPending,
    ApprovalRejected,
}

impl Listing {
    pub fn display_status(&self, now: NaiveDateTime) -> DisplayStatus {
        match self.state {
            ApprovalState::ApprovalPending => DisplayStatus::ApprovalPending,
            ApprovalState::ApprovalRejected => DisplayStatus::ApprovalRejected,
            ApprovalState::Approved => match self.valid_until {
                Some(valid_until) if valid_until < now => DisplayStatus::Expired,
                _ if self.open => DisplayStatus::Open,
                _ => DisplayStatus::Closed,
            },
        }
    }
}

/// Per-marketplace approval rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModerationPolicy {
    /// Marketplace setting: listings need admin approval before going live.
    pub pre_approved_listings: bool,
    /// Feature flag gating the approval workflow for new listings.
    pub approvals_enabled: bool,
}

impl ModerationPolicy {
    /// Filters offered in the listing search for this marketplace.
    pub fn status_filters(&self) -> Vec<DisplayStatus> {
        let mut statuses = vec![
            DisplayStatus::Open,
            DisplayStatus::Closed,
            DisplayStatus::Expired,
        ];
        if self.pre_approved_listings {
            statuses.push(DisplayStatus::ApprovalPending);
            statuses.push(DisplayStatus::ApprovalRejected);
        }
        statuses
    }

    pub fn state_for_new_listing(&self, author_is_admin: bool) -> ApprovalState {
        if self.approvals_enabled && self.pre_approved_listings && !author_is_admin {
            ApprovalState::ApprovalPending
        } else {
            ApprovalState::Approved
        }
    }

    /// State to set after the author edits a listing, `None` to keep it.
    ///
    /// Edits to an already reviewed listing send it back for review.
    pub fn state_after_author_edit(
        &self,
        current: ApprovalState,
        author_is_admin: bool,
    ) -> Option<ApprovalState> {
        if self.pre_approved_listings && !author_is_admin {
            match current {
                ApprovalState::Approved | ApprovalState::ApprovalRejected => {
                    Some(ApprovalState::ApprovalPending)
                }
                ApprovalState::ApprovalPending => None,
            }
        } else {
            Some(ApprovalState::Approved)
        }
    }

    pub fn show_approval_link(&self, listing: &Listing, admin_mode: bool) -> bool {
        self.approvals_enabled && admin_mode && listing.state == ApprovalState::ApprovalPending
    }
}
