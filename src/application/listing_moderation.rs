use crate::domain::listing::{ApprovalState, Listing, ModerationPolicy};
use serde::Serialize;
use tracing::info;

/// Mail the caller should queue after a moderation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingNotification {
    SubmittedForReview { listing_id: u64, admin_id: String },
    Approved { listing_id: u64, author_id: String },
    Rejected { listing_id: u64, author_id: String },
}

/// Applies an admin's review to a listing.
///
/// Only `approved` and `approval_rejected` are decisions; any other requested
/// state leaves the listing untouched and returns `None`.
pub fn review(listing: &mut Listing, requested: ApprovalState) -> Option<ListingNotification> {
    let notification = match requested {
        ApprovalState::Approved => ListingNotification::Approved {
            listing_id: listing.id,
            author_id: listing.author_id.clone(),
        },
        ApprovalState::ApprovalRejected => ListingNotification::Rejected {
            listing_id: listing.id,
            author_id: listing.author_id.clone(),
        },
        ApprovalState::ApprovalPending => return None,
    };
    listing.state = requested;
    info!(listing_id = listing.id, state = requested.as_str(), "listing reviewed");
    Some(notification)
}

/// Sets the state of a freshly created listing and tells admins when it waits
/// for review.
pub fn on_create(
    policy: &ModerationPolicy,
    listing: &mut Listing,
    author_is_admin: bool,
    admin_ids: &[String],
) -> Vec<ListingNotification> {
    listing.state = policy.state_for_new_listing(author_is_admin);
    review_requests(listing, admin_ids)
}

/// Updates the state after the author saved changes.
pub fn on_author_update(
    policy: &ModerationPolicy,
    listing: &mut Listing,
    author_is_admin: bool,
    admin_ids: &[String],
) -> Vec<ListingNotification> {
    if let Some(state) = policy.state_after_author_edit(listing.state, author_is_admin) {
        listing.state = state;
    }
    review_requests(listing, admin_ids)
}

fn review_requests(listing: &Listing, admin_ids: &[String]) -> Vec<ListingNotification> {
    if listing.state != ApprovalState::ApprovalPending {
        return Vec::new();
    }
    admin_ids
        .iter()
        .map(|admin_id| ListingNotification::SubmittedForReview {
            listing_id: listing.id,
            admin_id: admin_id.clone(),
        })
        .collect()
}
