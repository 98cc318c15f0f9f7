use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, NewInvoice};
use crate::schema::invoices;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i32,
    pub status: String,
    pub date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: row.id,
            customer_id: row.customer_id,
            amount_in_cents: row.amount,
            status: row.status.parse().map_err(DomainError::Internal)?,
            date: row.date,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoiceRow {
    pub customer_id: String,
    pub amount: i32,
    pub status: String,
    pub date: NaiveDate,
}

impl From<NewInvoice> for NewInvoiceRow {
    fn from(invoice: NewInvoice) -> Self {
        Self {
            customer_id: invoice.customer_id,
            amount: invoice.amount_in_cents,
            status: invoice.status.as_str().to_string(),
            date: invoice.date,
        }
    }
}

/// Only the mutable columns; `id` and `date` are never updated.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = invoices)]
pub struct InvoiceChangesRow {
    pub customer_id: String,
    pub amount: i32,
    pub status: String,
}

impl From<InvoiceChanges> for InvoiceChangesRow {
    fn from(changes: InvoiceChanges) -> Self {
        Self {
            customer_id: changes.customer_id,
            amount: changes.amount_in_cents,
            status: changes.status.as_str().to_string(),
        }
    }
}
