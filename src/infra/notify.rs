//! Out-of-band delivery seam for verification codes.
//!
//! The engine never sends the code itself; transport (email, webhook, the
//! dashboard's notification service) is an external collaborator behind
//! this trait. Delivery is fire-and-forget: a failure leaves the pending
//! commit valid, it just cannot be verified until the code is resent
//! through an external path.

use anyhow::Result;

/// Collaborator that delivers a verification code to the committer.
pub trait CodeNotifier: Send + Sync {
    fn deliver(&self, author_email: &str, commit_id: &str, code: &str) -> Result<()>;
}

/// Default notifier that drops codes on the floor.
///
/// Used when the host wires no transport (tests, local-only dashboards).
/// The issued code still reaches the caller through the commit ticket.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl CodeNotifier for NullNotifier {
    fn deliver(&self, author_email: &str, commit_id: &str, _code: &str) -> Result<()> {
        log::debug!(
            "no notifier configured; verification code for commit {} to {} not dispatched",
            commit_id,
            author_email
        );
        Ok(())
    }
}
