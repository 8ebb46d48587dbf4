//! Append-only audit record for manager and finance decisions
use chrono::Utc;

use super::request::TimeStamp;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecisionStep {
    #[n(0)]
    Manager,
    #[n(1)]
    Finance,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DecisionAction {
    #[n(0)]
    Approve,
    #[n(1)]
    Reject,
}

/// One decision record is appended per successful gate transition, in the
/// same storage transaction as the status update it explains. Never
/// mutated or deleted afterwards.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Decision {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub request_id: String,
    #[n(2)]
    pub step: DecisionStep,
    #[n(3)]
    pub action: DecisionAction,
    #[n(4)]
    pub reason: Option<String>,
    #[n(5)]
    pub decided_by: String,
    #[n(6)]
    pub created_at: TimeStamp<Utc>,
}

impl Decision {
    pub fn new(
        id: String,
        request_id: String,
        step: DecisionStep,
        action: DecisionAction,
        reason: Option<String>,
        decided_by: String,
    ) -> Self {
        Self {
            id,
            request_id,
            step,
            action,
            reason,
            decided_by,
            created_at: TimeStamp::new(),
        }
    }
}
