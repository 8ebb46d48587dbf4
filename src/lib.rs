//! Finance-request approval workflow
//!
//! A requester drafts a request, submits it, and it passes through a
//! manager gate and a finance gate before reaching a terminal state. The
//! engine itself ([`rules`], [`validation`], [`transitions`]) is pure;
//! [`service`] wires it to sled-backed storage.

pub mod decision;
pub mod error;
pub mod request;
pub mod rules;
pub mod service;
pub mod transitions;
pub mod utils;
pub mod validation;
