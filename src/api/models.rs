use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Custom deserializer: accepts "2024-02-01" or a full RFC 3339 timestamp
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|e| serde::de::Error::custom(format!("invalid due date '{}': {}", raw, e)))
}

// Enumerations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Active,
    PaidOff,
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    BankTransfer,
    CreditCard,
    DirectDebit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Up,
    Down,
    Degraded,
}

/// Wire name of an enum value, e.g. `PAID_OFF`.
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

macro_rules! impl_wire_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&wire_name(self))
                }
            }
        )*
    };
}

impl_wire_display!(
    EmploymentStatus,
    LoanStatus,
    PaymentMethod,
    PaymentStatus,
    ServiceStatus
);

// Loan models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub amount: f64,
    pub term_months: u32,
    pub employment_status: EmploymentStatus,
    pub applicant_name: String,
    pub applicant_email: String,
    pub annual_income: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome of a loan application.
///
/// The server sends a flat object where `rejectionReason` is meaningful only
/// when `approved` is false; decoding rejects bodies that break that rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoanResultWire", into = "LoanResultWire")]
pub enum LoanResult {
    Approved {
        loan_id: String,
        interest_rate: f64,
        monthly_payment: f64,
    },
    Rejected {
        reason: String,
    },
}

impl LoanResult {
    pub fn is_approved(&self) -> bool {
        matches!(self, LoanResult::Approved { .. })
    }

    pub fn loan_id(&self) -> Option<&str> {
        match self {
            LoanResult::Approved { loan_id, .. } => Some(loan_id),
            LoanResult::Rejected { .. } => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            LoanResult::Approved { .. } => None,
            LoanResult::Rejected { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoanResultWire {
    approved: bool,
    #[serde(default)]
    loan_id: String,
    #[serde(default)]
    interest_rate: f64,
    #[serde(default)]
    monthly_payment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
}

impl TryFrom<LoanResultWire> for LoanResult {
    type Error = String;

    fn try_from(wire: LoanResultWire) -> Result<Self, Self::Error> {
        match (wire.approved, wire.rejection_reason) {
            (true, None) => Ok(LoanResult::Approved {
                loan_id: wire.loan_id,
                interest_rate: wire.interest_rate,
                monthly_payment: wire.monthly_payment,
            }),
            (true, Some(_)) => Err("approved loan result carries a rejectionReason".to_string()),
            (false, Some(reason)) => Ok(LoanResult::Rejected { reason }),
            (false, None) => Err("rejected loan result is missing rejectionReason".to_string()),
        }
    }
}

impl From<LoanResult> for LoanResultWire {
    fn from(result: LoanResult) -> Self {
        match result {
            LoanResult::Approved {
                loan_id,
                interest_rate,
                monthly_payment,
            } => LoanResultWire {
                approved: true,
                loan_id,
                interest_rate,
                monthly_payment,
                rejection_reason: None,
            },
            LoanResult::Rejected { reason } => LoanResultWire {
                approved: false,
                loan_id: String::new(),
                interest_rate: 0.0,
                monthly_payment: 0.0,
                rejection_reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetail {
    pub id: String,
    pub amount: f64,
    pub term_months: u32,
    pub interest_rate: f64,
    pub status: LoanStatus,
    pub applicant_name: String,
    pub applicant_email: String,
    pub employment_status: EmploymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<EmploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateLoan {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.term_months.is_none()
            && self.employment_status.is_none()
            && self.notes.is_none()
    }
}

// Payment models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub loan_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_paid: f64,
    pub remaining_balance: f64,
    #[serde(deserialize_with = "deserialize_due_date")]
    pub next_payment_due: NaiveDate,
    pub payment_count: u32,
}

// Health models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub status: ServiceStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Seconds since the service started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}
