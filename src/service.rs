//! Service layer API wiring the pure workflow engine to storage
//!
//! The engine modules (`rules`, `validation`, `transitions`) never touch
//! storage; this layer loads the persisted request, gates the action, runs
//! the transition and persists the outcome. Gate decisions pair the status
//! update with the audit decision append in a single sled transaction that
//! re-verifies the source status at write time, so a concurrent actor
//! cannot slip a second decision in between.
use std::sync::Arc;

use sled::transaction::{ConflictableTransactionError, TransactionError};

use super::decision::{Decision, DecisionAction, DecisionStep};
use super::error::ServiceError;
use super::request::{DraftUpdate, FinanceRequest, RequestStatus, RequestType, Role, User};
use super::{rules, transitions, utils};

fn request_key(id: &str) -> Vec<u8> {
    format!("request/{id}").into_bytes()
}

// The decision id only makes the key unique; timeline order comes from the
// record's created_at, never from how the encoded ids happen to sort.
fn decision_key(request_id: &str, decision_id: &str) -> Vec<u8> {
    format!("decision/{request_id}/{decision_id}").into_bytes()
}

fn user_key(id: &str) -> Vec<u8> {
    format!("user/{id}").into_bytes()
}

fn unwrap_abort(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Abort(err) => err,
        TransactionError::Storage(err) => ServiceError::Storage(err),
    }
}

pub struct ApprovalService {
    instance: Arc<sled::Db>,
}

impl ApprovalService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    fn load_request(&self, request_id: &str) -> Result<FinanceRequest, ServiceError> {
        let bytes = self
            .instance
            .get(request_key(request_id))?
            .ok_or_else(|| ServiceError::RequestNotFound(request_id.to_string()))?;

        Ok(minicbor::decode(&bytes)?)
    }

    fn put_request(&self, req: &FinanceRequest) -> Result<(), ServiceError> {
        self.instance
            .insert(request_key(&req.id), minicbor::to_vec(req)?)?;
        Ok(())
    }

    /// Replace the stored request with `next`, but only if the status a
    /// concurrent actor could have raced on is still `expected`.
    fn write_transition(
        &self,
        next: &FinanceRequest,
        expected: RequestStatus,
        decision: Option<&Decision>,
    ) -> Result<(), ServiceError> {
        let req_key = request_key(&next.id);
        let next_bytes = minicbor::to_vec(next)?;
        let decision_write = match decision {
            Some(decision) => Some((
                decision_key(&next.id, &decision.id),
                minicbor::to_vec(decision)?,
            )),
            None => None,
        };

        self.instance
            .transaction(|tx| {
                let stored_bytes = tx.get(req_key.as_slice())?.ok_or_else(|| {
                    ConflictableTransactionError::Abort(ServiceError::RequestNotFound(
                        next.id.clone(),
                    ))
                })?;
                let stored: FinanceRequest = minicbor::decode(&stored_bytes)
                    .map_err(|e| ConflictableTransactionError::Abort(ServiceError::Decode(e)))?;

                if stored.status != expected {
                    return Err(ConflictableTransactionError::Abort(
                        ServiceError::StatusConflict {
                            expected,
                            found: stored.status,
                        },
                    ));
                }

                tx.insert(req_key.as_slice(), next_bytes.as_slice())?;
                if let Some((dec_key, dec_bytes)) = &decision_write {
                    tx.insert(dec_key.as_slice(), dec_bytes.as_slice())?;
                }

                Ok(())
            })
            .map_err(unwrap_abort)
    }

    /// Start a new draft of the given type, all fields empty
    pub fn create_draft(
        &self,
        actor: &User,
        rtype: RequestType,
    ) -> Result<FinanceRequest, ServiceError> {
        if !rules::can_create_request(actor) {
            return Err(ServiceError::Forbidden("only a requester can create requests"));
        }

        let request = FinanceRequest::new(utils::new_request_id()?, actor.id.clone(), rtype);
        self.put_request(&request)?;

        Ok(request)
    }

    /// Merge a partial edit into a draft, last write wins
    pub fn edit_draft(
        &self,
        actor: &User,
        request_id: &str,
        update: DraftUpdate,
    ) -> Result<FinanceRequest, ServiceError> {
        let existing = self.load_request(request_id)?;

        if !rules::can_edit_draft(actor, &existing) {
            return Err(ServiceError::Forbidden("only the creator may edit a draft"));
        }

        let updated = existing.apply_update(update);
        self.put_request(&updated)?;

        Ok(updated)
    }

    /// Validate, authorize and move a draft to the manager gate
    pub fn submit(&self, actor: &User, request_id: &str) -> Result<FinanceRequest, ServiceError> {
        let existing = self.load_request(request_id)?;

        rules::can_submit(actor, &existing).map_err(ServiceError::NotSubmittable)?;

        let next = transitions::submit(&existing)?;
        self.write_transition(&next, existing.status, None)?;

        Ok(next)
    }

    /// Apply a manager or finance decision, whichever gate the request is
    /// waiting at. The status update and the decision record land in the
    /// same transaction.
    pub fn decide(
        &self,
        actor: &User,
        request_id: &str,
        action: DecisionAction,
        reason: Option<String>,
    ) -> Result<FinanceRequest, ServiceError> {
        let existing = self.load_request(request_id)?;

        let (step, next) = if rules::can_manager_decide(actor, &existing) {
            (
                DecisionStep::Manager,
                transitions::apply_manager_decision(&existing, action)?,
            )
        } else if rules::can_finance_decide(actor, &existing) {
            (
                DecisionStep::Finance,
                transitions::apply_finance_decision(&existing, action)?,
            )
        } else {
            return Err(ServiceError::Forbidden(
                "actor may not decide this request in its current state",
            ));
        };

        let decision = Decision::new(
            utils::new_decision_id()?,
            request_id.to_string(),
            step,
            action,
            reason,
            actor.id.clone(),
        );

        self.write_transition(&next, existing.status, Some(&decision))?;

        Ok(next)
    }

    /// Load a request plus its decision timeline, oldest first
    pub fn view(
        &self,
        actor: &User,
        request_id: &str,
    ) -> Result<(FinanceRequest, Vec<Decision>), ServiceError> {
        let request = self.load_request(request_id)?;

        if !rules::can_view_request(actor, &request) {
            return Err(ServiceError::Forbidden("actor may not view this request"));
        }

        let mut decisions: Vec<Decision> = Vec::new();
        for entry in self.instance.scan_prefix(format!("decision/{request_id}/")) {
            let (_, bytes) = entry?;
            decisions.push(minicbor::decode(&bytes)?);
        }
        decisions.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok((request, decisions))
    }

    /// All requests for privileged actors, own requests otherwise.
    /// Newest first.
    pub fn list_requests(&self, actor: &User) -> Result<Vec<FinanceRequest>, ServiceError> {
        let privileged = actor.has_role(Role::Manager)
            || actor.has_role(Role::Finance)
            || actor.has_role(Role::Admin);

        let mut requests = Vec::new();
        for entry in self.instance.scan_prefix("request/") {
            let (_, bytes) = entry?;
            let request: FinanceRequest = minicbor::decode(&bytes)?;
            if privileged || request.created_by == actor.id {
                requests.push(request);
            }
        }
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(requests)
    }

    /// Requests waiting at the caller's gate, oldest first. Manager takes
    /// precedence when the actor holds both operational roles.
    pub fn inbox(&self, actor: &User) -> Result<Vec<FinanceRequest>, ServiceError> {
        let status = if actor.has_role(Role::Manager) {
            RequestStatus::WaitingForManager
        } else if actor.has_role(Role::Finance) {
            RequestStatus::WaitingForFinance
        } else {
            return Err(ServiceError::Forbidden("actor has no decision gate"));
        };

        let mut requests = Vec::new();
        for entry in self.instance.scan_prefix("request/") {
            let (_, bytes) = entry?;
            let request: FinanceRequest = minicbor::decode(&bytes)?;
            if request.status == status {
                requests.push(request);
            }
        }
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(requests)
    }

    /// Upsert a user record from the identity collaborator
    pub fn provision_user(&self, user: &User) -> Result<(), ServiceError> {
        if user.roles.is_empty() {
            return Err(ServiceError::EmptyRoleSet);
        }

        self.instance
            .insert(user_key(&user.id), minicbor::to_vec(user)?)?;

        Ok(())
    }

    /// Fails for unknown ids, the "not yet provisioned" signal
    pub fn load_user(&self, user_id: &str) -> Result<User, ServiceError> {
        let bytes = self
            .instance
            .get(user_key(user_id))?
            .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))?;

        Ok(minicbor::decode(&bytes)?)
    }

    /// Replace a user's role set. Admin-only; the new set must be
    /// non-empty and the acting admin may not strip their own ADMIN role.
    pub fn set_user_roles(
        &self,
        actor: &User,
        target_id: &str,
        roles: Vec<Role>,
    ) -> Result<User, ServiceError> {
        if !actor.has_role(Role::Admin) {
            return Err(ServiceError::Forbidden("only an admin may manage roles"));
        }
        if roles.is_empty() {
            return Err(ServiceError::EmptyRoleSet);
        }
        if actor.id == target_id && !roles.contains(&Role::Admin) {
            return Err(ServiceError::SelfAdminRemoval);
        }

        let mut target = self.load_user(target_id)?;
        target.roles = roles;
        self.instance
            .insert(user_key(target_id), minicbor::to_vec(&target)?)?;

        Ok(target)
    }
}
