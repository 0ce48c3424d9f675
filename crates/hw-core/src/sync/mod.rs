//! Catalog reconciliation
//!
//! [`Reconciler`] compares a catalog with the files under its root and
//! proposes additions, moves and deletions. A [`DecisionPolicy`] chosen by
//! the caller approves each one; the outcome comes back as a [`SyncReport`].

mod engine;
mod policy;
mod report;

pub use engine::{Reconciler, SyncOptions, apply_decision};
pub use policy::{AutoApprove, DecisionPolicy, DeclineAll};
pub use report::{
    Decision, DeleteDecision, DeleteReason, DuplicateFinding, MoveDecision, SyncReport,
    SyncWarning,
};
