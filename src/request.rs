//! Core request, user and workflow enum types
use chrono::{DateTime, TimeZone, Utc};

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    #[n(0)]
    Requester,
    #[n(1)]
    Manager,
    #[n(2)]
    Finance,
    #[n(3)]
    Admin,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestStatus {
    #[n(0)]
    Draft,
    #[n(1)]
    WaitingForManager,
    #[n(2)]
    WaitingForFinance,
    #[n(3)]
    Approved,
    #[n(4)]
    Rejected,
}

impl RequestStatus {
    /// Approved and Rejected accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestType {
    #[n(0)]
    Purchase,
    #[n(1)]
    Reimbursement,
    #[n(2)]
    Subscription,
    #[n(3)]
    InvoicePayment,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum BillingCycle {
    #[n(0)]
    Monthly,
    #[n(1)]
    Yearly,
}

/// An actor resolved by the identity collaborator. Roles are a capability
/// bag with membership-only semantics, not a hierarchy.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Eq, PartialEq)]
pub struct User {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(id: String, roles: Vec<Role>) -> Self {
        Self { id, roles }
    }
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// The flat persisted shape. While the request is a Draft any field may be
// absent or blank; validation gates the DRAFT -> WAITING_FOR_MANAGER edge.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct FinanceRequest {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub created_by: String,
    #[n(2)]
    pub status: RequestStatus,
    #[n(3)]
    pub rtype: RequestType,
    #[n(4)]
    pub created_at: TimeStamp<Utc>,
    #[n(5)]
    pub title: Option<String>,
    #[n(6)]
    pub amount: Option<f64>,
    #[n(7)]
    pub reason: Option<String>,
    // type-conditional fields
    #[n(8)]
    pub vendor: Option<String>, // Purchase, Subscription, InvoicePayment
    #[n(9)]
    pub cost_center: Option<String>, // Purchase
    #[n(10)]
    pub expense_date: Option<String>, // Reimbursement, "YYYY-MM-DD"
    #[n(11)]
    pub billing_cycle: Option<BillingCycle>, // Subscription
    #[n(12)]
    pub invoice_number: Option<String>, // InvoicePayment
}

/// A partial draft edit. Absent fields keep their stored value, present
/// fields overwrite it (last write wins).
#[derive(Debug, Default, Clone)]
pub struct DraftUpdate {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub reason: Option<String>,
    pub vendor: Option<String>,
    pub cost_center: Option<String>,
    pub expense_date: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    pub invoice_number: Option<String>,
}

impl FinanceRequest {
    /// A fresh draft with every field empty. Drafts are the sole entry
    /// point into the pipeline.
    pub fn new(id: String, created_by: String, rtype: RequestType) -> Self {
        Self {
            id,
            created_by,
            status: RequestStatus::Draft,
            rtype,
            created_at: TimeStamp::new(),
            title: None,
            amount: None,
            reason: None,
            vendor: None,
            cost_center: None,
            expense_date: None,
            billing_cycle: None,
            invoice_number: None,
        }
    }
    pub fn set_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
    pub fn set_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
    pub fn set_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
    pub fn set_vendor(mut self, vendor: &str) -> Self {
        self.vendor = Some(vendor.to_string());
        self
    }
    pub fn set_cost_center(mut self, cost_center: &str) -> Self {
        self.cost_center = Some(cost_center.to_string());
        self
    }
    pub fn set_expense_date(mut self, expense_date: &str) -> Self {
        self.expense_date = Some(expense_date.to_string());
        self
    }
    pub fn set_billing_cycle(mut self, billing_cycle: BillingCycle) -> Self {
        self.billing_cycle = Some(billing_cycle);
        self
    }
    pub fn set_invoice_number(mut self, invoice_number: &str) -> Self {
        self.invoice_number = Some(invoice_number.to_string());
        self
    }
    /// Merge a partial edit into the draft fields
    pub fn apply_update(mut self, update: DraftUpdate) -> Self {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(amount) = update.amount {
            self.amount = Some(amount);
        }
        if let Some(reason) = update.reason {
            self.reason = Some(reason);
        }
        if let Some(vendor) = update.vendor {
            self.vendor = Some(vendor);
        }
        if let Some(cost_center) = update.cost_center {
            self.cost_center = Some(cost_center);
        }
        if let Some(expense_date) = update.expense_date {
            self.expense_date = Some(expense_date);
        }
        if let Some(billing_cycle) = update.billing_cycle {
            self.billing_cycle = Some(billing_cycle);
        }
        if let Some(invoice_number) = update.invoice_number {
            self.invoice_number = Some(invoice_number);
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl<T: TimeZone> PartialEq for TimeStamp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: TimeZone> Eq for TimeStamp<T> {}

impl<T: TimeZone> PartialOrd for TimeStamp<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TimeZone> Ord for TimeStamp<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
