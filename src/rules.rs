//! Role-based authorization rules
//!
//! Each predicate is checked independently per action. No role implies
//! another, and ADMIN in particular never substitutes for an operational
//! role: it grants global read visibility and role management, nothing
//! else.
use crate::request::{FinanceRequest, RequestStatus, Role, User};
use crate::validation::{self, FieldError};

fn is_owner(actor: &User, req: &FinanceRequest) -> bool {
    actor.id == req.created_by
}

/// Only a REQUESTER can start a draft. ADMIN alone is insufficient.
pub fn can_create_request(actor: &User) -> bool {
    actor.has_role(Role::Requester)
}

/// MANAGER, FINANCE and ADMIN see everything; a plain requester sees only
/// their own requests.
pub fn can_view_request(actor: &User, req: &FinanceRequest) -> bool {
    if actor.has_role(Role::Manager) || actor.has_role(Role::Finance) || actor.has_role(Role::Admin)
    {
        return true;
    }

    is_owner(actor, req)
}

/// Drafts are editable by their creator while the creator holds REQUESTER.
/// ADMIN is categorically excluded from content edits, even as owner.
pub fn can_edit_draft(actor: &User, req: &FinanceRequest) -> bool {
    if actor.has_role(Role::Admin) {
        return false;
    }

    req.status == RequestStatus::Draft && is_owner(actor, req) && actor.has_role(Role::Requester)
}

/// Compose the edit authorization (which already pins the Draft status)
/// with full field validation, so a caller can surface every problem at
/// once.
pub fn can_submit(actor: &User, req: &FinanceRequest) -> Result<(), Vec<FieldError>> {
    if !can_edit_draft(actor, req) {
        return Err(vec![FieldError::new(
            "auth",
            "Not allowed to submit this request.",
        )]);
    }

    validation::validate_for_submit(req)
}

/// Holding ADMIN has no bearing here, neither blocking nor substituting
/// for MANAGER.
pub fn can_manager_decide(actor: &User, req: &FinanceRequest) -> bool {
    actor.has_role(Role::Manager) && req.status == RequestStatus::WaitingForManager
}

pub fn can_finance_decide(actor: &User, req: &FinanceRequest) -> bool {
    actor.has_role(Role::Finance) && req.status == RequestStatus::WaitingForFinance
}
