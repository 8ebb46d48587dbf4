//! Error types for the workflow engine and service layer
use crate::request::RequestStatus;
use crate::validation::FieldError;

/// A transition attempted from the wrong source status. One named variant
/// per transition function so a boundary can map this to a conflict-class
/// response, distinct from "forbidden" and from "bad input".
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("only DRAFT requests can be submitted, status was {0:?}")]
    InvalidSubmit(RequestStatus),
    #[error("manager decisions apply only to WAITING_FOR_MANAGER requests, status was {0:?}")]
    InvalidManagerDecision(RequestStatus),
    #[error("finance decisions apply only to WAITING_FOR_FINANCE requests, status was {0:?}")]
    InvalidFinanceDecision(RequestStatus),
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("request not found: {0}")]
    RequestNotFound(String),
    #[error("user not provisioned: {0}")]
    UserNotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("request is not ready for submission")]
    NotSubmittable(Vec<FieldError>),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("request status changed concurrently, expected {expected:?} but found {found:?}")]
    StatusConflict {
        expected: RequestStatus,
        found: RequestStatus,
    },
    #[error("a role set must not be empty")]
    EmptyRoleSet,
    #[error("an admin may not remove their own ADMIN role")]
    SelfAdminRemoval,
    #[error(transparent)]
    Storage(#[from] sled::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] minicbor::encode::Error<std::convert::Infallible>),
    #[error("failed to decode record: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
