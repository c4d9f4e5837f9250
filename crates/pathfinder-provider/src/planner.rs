//! Change detection between tracked and declared movement plans

use std::fmt;

use pathfinder_core::MovementPlan;

/// Lifecycle call the host should make to converge on the declared plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Create,
    Update,
    /// Delete the tracked plan, then create the declared one
    Replace,
    Delete,
    NoOp,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Change::Create => "create",
            Change::Update => "update in-place",
            Change::Replace => "replace",
            Change::Delete => "destroy",
            Change::NoOp => "no changes",
        };
        f.write_str(label)
    }
}

/// Decide which lifecycle call moves `prior` to `desired`.
///
/// The device cannot rename a plan, so a changed name forces a replacement.
/// Any other difference is an in-place update.
pub fn plan_change(prior: Option<&MovementPlan>, desired: Option<&MovementPlan>) -> Change {
    match (prior, desired) {
        (None, None) => Change::NoOp,
        (None, Some(_)) => Change::Create,
        (Some(_), None) => Change::Delete,
        (Some(prior), Some(desired)) if prior == desired => Change::NoOp,
        (Some(prior), Some(desired)) if prior.name != desired.name => Change::Replace,
        (Some(_), Some(_)) => Change::Update,
    }
}
