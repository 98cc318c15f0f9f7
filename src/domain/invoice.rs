use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::{validate_amount, validate_status};

/// Route of the invoices listing page. Mutations revalidate it and
/// create/update redirect to it.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(InvoiceStatus::Paid),
            "pending" => Ok(InvoiceStatus::Pending),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// Untyped form fields as they arrive from the client. A missing field reads
/// as an empty string; `validate_invoice_form` decides what is acceptable.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct InvoiceForm {
    #[serde(rename = "customerId")]
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub customer_id: String,
    /// Decimal amount in currency units, e.g. "12.50"
    #[validate(custom(function = "validate_amount"))]
    pub amount: String,
    /// Either "paid" or "pending"
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

/// Validated form input.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

/// Row to insert; `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount_in_cents: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Mutable fields of an existing invoice. `id` and `date` never change.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount_in_cents: i32,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount_in_cents: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Invoice>,
    pub total: i64,
}

/// Where the client should be sent after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect(pub &'static str);

impl Redirect {
    pub fn location(&self) -> &'static str {
        self.0
    }
}
