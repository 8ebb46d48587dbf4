//! Field validation gating the DRAFT -> WAITING_FOR_MANAGER transition
//!
//! Validation never short-circuits: every applicable check runs and all
//! errors are collected, so a form can highlight every offending field in
//! one pass.
use chrono::NaiveDate;

use crate::request::{BillingCycle, FinanceRequest, RequestType};

const MIN_TITLE_LEN: usize = 3;
const MIN_REASON_LEN: usize = 10;

/// The unit of validation failure reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The validated, per-type view of a submittable request. The flat
/// [`FinanceRequest`] stays the persisted shape; this variant model is what
/// a successful validation proves the draft contains.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedFields {
    Purchase {
        vendor: String,
        cost_center: String,
    },
    Reimbursement {
        expense_date: NaiveDate,
    },
    Subscription {
        vendor: String,
        billing_cycle: BillingCycle,
    },
    InvoicePayment {
        vendor: String,
        invoice_number: String,
    },
}

// A field is blank when absent or empty after trimming
fn non_blank(value: &Option<String>) -> Option<&str> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.trim()),
        _ => None,
    }
}

fn require(
    value: &Option<String>,
    field: &'static str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match non_blank(value) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Resolve the type-conditional fields into their validated variant,
/// accumulating one error per missing or malformed field.
pub fn typed_fields(req: &FinanceRequest) -> Result<TypedFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let typed = match req.rtype {
        RequestType::Purchase => {
            let vendor = require(
                &req.vendor,
                "vendor",
                "Vendor is required for purchases.",
                &mut errors,
            );
            let cost_center = require(
                &req.cost_center,
                "cost_center",
                "Cost center is required for purchases.",
                &mut errors,
            );
            match (vendor, cost_center) {
                (Some(vendor), Some(cost_center)) => Some(TypedFields::Purchase {
                    vendor,
                    cost_center,
                }),
                _ => None,
            }
        }
        RequestType::Reimbursement => match non_blank(&req.expense_date) {
            None => {
                errors.push(FieldError::new(
                    "expense_date",
                    "Expense date is required for reimbursements.",
                ));
                None
            }
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(expense_date) => Some(TypedFields::Reimbursement { expense_date }),
                Err(_) => {
                    errors.push(FieldError::new(
                        "expense_date",
                        "Expense date must be a valid ISO date (YYYY-MM-DD).",
                    ));
                    None
                }
            },
        },
        RequestType::Subscription => {
            let vendor = require(
                &req.vendor,
                "vendor",
                "Vendor is required for subscriptions.",
                &mut errors,
            );
            let billing_cycle = match req.billing_cycle {
                Some(cycle) => Some(cycle),
                None => {
                    errors.push(FieldError::new(
                        "billing_cycle",
                        "Billing cycle must be MONTHLY or YEARLY.",
                    ));
                    None
                }
            };
            match (vendor, billing_cycle) {
                (Some(vendor), Some(billing_cycle)) => Some(TypedFields::Subscription {
                    vendor,
                    billing_cycle,
                }),
                _ => None,
            }
        }
        RequestType::InvoicePayment => {
            let vendor = require(
                &req.vendor,
                "vendor",
                "Vendor is required for invoice payments.",
                &mut errors,
            );
            let invoice_number = require(
                &req.invoice_number,
                "invoice_number",
                "Invoice number is required for invoice payments.",
                &mut errors,
            );
            match (vendor, invoice_number) {
                (Some(vendor), Some(invoice_number)) => Some(TypedFields::InvoicePayment {
                    vendor,
                    invoice_number,
                }),
                _ => None,
            }
        }
    };

    match typed {
        Some(typed) if errors.is_empty() => Ok(typed),
        _ => Err(errors),
    }
}

/// Check whether a draft carries everything its type demands for
/// submission. Ok only when the accumulated error list is empty.
pub fn validate_for_submit(req: &FinanceRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    // Global requirements, evaluated unconditionally
    match non_blank(&req.title) {
        Some(title) if title.chars().count() >= MIN_TITLE_LEN => {}
        _ => errors.push(FieldError::new(
            "title",
            format!("Title must be at least {MIN_TITLE_LEN} characters."),
        )),
    }
    match req.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => {}
        _ => errors.push(FieldError::new(
            "amount",
            "Amount must be greater than 0.",
        )),
    }
    match non_blank(&req.reason) {
        Some(reason) if reason.chars().count() >= MIN_REASON_LEN => {}
        _ => errors.push(FieldError::new(
            "reason",
            format!("Reason must be at least {MIN_REASON_LEN} characters."),
        )),
    }

    // Type-conditional requirements, same error list
    if let Err(type_errors) = typed_fields(req) {
        errors.extend(type_errors);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
