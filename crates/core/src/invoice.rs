//! Invoice rows and their status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{Cents, CustomerId, InvoiceId};

/// Invoice settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(DomainError::validation(format!("unknown invoice status '{other}'"))),
        }
    }
}

/// A persisted invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values for a single INSERT into `invoices` (id is assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values for a single UPDATE of an existing invoice. The issue date is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn apply(&mut self, changes: &InvoiceChanges) {
        self.customer_id = changes.customer_id;
        self.amount = changes.amount;
        self.status = changes.status;
    }
}
