//! The request state machine
//!
//! Pure functions from a request value to a new request value with an
//! updated status. A wrong-state attempt is always an explicit
//! [`TransitionError`], never a no-op, and the input is never mutated.
//! Authorization and field validation are caller responsibilities; these
//! functions only guard the source status.
use crate::decision::DecisionAction;
use crate::error::TransitionError;
use crate::request::{FinanceRequest, RequestStatus};

fn with_status(req: &FinanceRequest, status: RequestStatus) -> FinanceRequest {
    let mut next = req.clone();
    next.status = status;
    next
}

/// DRAFT -> WAITING_FOR_MANAGER
pub fn submit(req: &FinanceRequest) -> Result<FinanceRequest, TransitionError> {
    if req.status != RequestStatus::Draft {
        return Err(TransitionError::InvalidSubmit(req.status));
    }

    Ok(with_status(req, RequestStatus::WaitingForManager))
}

/// WAITING_FOR_MANAGER -> WAITING_FOR_FINANCE | REJECTED
pub fn apply_manager_decision(
    req: &FinanceRequest,
    action: DecisionAction,
) -> Result<FinanceRequest, TransitionError> {
    if req.status != RequestStatus::WaitingForManager {
        return Err(TransitionError::InvalidManagerDecision(req.status));
    }

    let next = match action {
        DecisionAction::Approve => RequestStatus::WaitingForFinance,
        DecisionAction::Reject => RequestStatus::Rejected,
    };

    Ok(with_status(req, next))
}

/// WAITING_FOR_FINANCE -> APPROVED | REJECTED
pub fn apply_finance_decision(
    req: &FinanceRequest,
    action: DecisionAction,
) -> Result<FinanceRequest, TransitionError> {
    if req.status != RequestStatus::WaitingForFinance {
        return Err(TransitionError::InvalidFinanceDecision(req.status));
    }

    let next = match action {
        DecisionAction::Approve => RequestStatus::Approved,
        DecisionAction::Reject => RequestStatus::Rejected,
    };

    Ok(with_status(req, next))
}
