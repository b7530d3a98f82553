//! Page status transition engine
//!
//! Two pure functions own every status change in the system. Both upload
//! managers call [`compute_status`] after an artifact write, so the SEO and
//! content paths can never drift apart; reviewer decisions go through
//! [`apply_review`]. Nothing else may assign a page status.

use copyflow_common::db::models::PageStatus;
use copyflow_common::{Error, Result};
use serde::Deserialize;

/// Reviewer decision on a page in `pending_review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    RequestRevision,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::RequestRevision => "request_revision",
        }
    }
}

/// Recompute a page's status after an artifact write.
///
/// The rule is a single idempotent recomputation from artifact presence:
/// both artifacts ⇒ `pending_review`, only SEO ⇒ `awaiting_content`, only
/// content ⇒ `awaiting_seo`, neither ⇒ `draft`. Reviewer-held states
/// (`pending_review`, `approved`, `rejected`) are left untouched here;
/// `revision_requested` is deliberately NOT held, so re-uploading the flagged
/// artifact moves the page back to `pending_review`.
pub fn compute_status(current: PageStatus, has_seo: bool, has_content: bool) -> PageStatus {
    match current {
        PageStatus::PendingReview | PageStatus::Approved | PageStatus::Rejected => current,
        PageStatus::Draft
        | PageStatus::AwaitingSeo
        | PageStatus::AwaitingContent
        | PageStatus::RevisionRequested => match (has_seo, has_content) {
            (true, true) => PageStatus::PendingReview,
            (true, false) => PageStatus::AwaitingContent,
            (false, true) => PageStatus::AwaitingSeo,
            (false, false) => PageStatus::Draft,
        },
    }
}

/// Apply a reviewer action. Valid only from `pending_review`.
pub fn apply_review(current: PageStatus, action: ReviewAction) -> Result<PageStatus> {
    if current != PageStatus::PendingReview {
        return Err(Error::Validation(format!(
            "review action '{}' is only valid from pending_review (page is {})",
            action.as_str(),
            current
        )));
    }
    Ok(match action {
        ReviewAction::Approve => PageStatus::Approved,
        ReviewAction::Reject => PageStatus::Rejected,
        ReviewAction::RequestRevision => PageStatus::RevisionRequested,
    })
}
