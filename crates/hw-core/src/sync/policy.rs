//! Approval policies for sync decisions

use super::report::Decision;

/// Decides whether a proposed decision is applied.
///
/// Injected by the caller so the engine never prompts on its own. Any
/// `FnMut(&Decision) -> bool` closure is a policy.
pub trait DecisionPolicy {
    fn approve(&mut self, decision: &Decision) -> bool;
}

/// Applies every decision
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl DecisionPolicy for AutoApprove {
    fn approve(&mut self, _decision: &Decision) -> bool {
        true
    }
}

/// Declines every decision
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclineAll;

impl DecisionPolicy for DeclineAll {
    fn approve(&mut self, _decision: &Decision) -> bool {
        false
    }
}

impl<F> DecisionPolicy for F
where
    F: FnMut(&Decision) -> bool,
{
    fn approve(&mut self, decision: &Decision) -> bool {
        self(decision)
    }
}
