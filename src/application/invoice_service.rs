use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{
    Invoice, InvoiceChanges, InvoiceForm, ListResult, NewInvoice, Redirect, INVOICES_PATH,
};
use crate::domain::ports::InvoiceRepository;
use crate::domain::validation::{amount_in_cents, validate_invoice_form};
use crate::infrastructure::page_cache::PageCache;

/// Form-driven invoice mutations. Validation failures are returned as-is;
/// store failures are logged and replaced by a generic error per operation.
pub struct InvoiceService {
    repo: Arc<dyn InvoiceRepository>,
    cache: PageCache,
}

impl InvoiceService {
    pub fn new(repo: Arc<dyn InvoiceRepository>, cache: PageCache) -> Self {
        Self { repo, cache }
    }

    pub fn page_cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn create_invoice(&self, form: &InvoiceForm) -> Result<Redirect, DomainError> {
        let input = validate_invoice_form(form)?;
        let new_invoice = NewInvoice {
            amount_in_cents: amount_in_cents(input.amount)?,
            customer_id: input.customer_id,
            status: input.status,
            date: Utc::now().date_naive(),
        };

        let id = self.repo.insert(new_invoice).map_err(|e| {
            log::error!("Error creating invoice: {}", e);
            DomainError::InvoiceCreation
        })?;
        log::info!("Created invoice {}", id);

        self.revalidate();
        Ok(Redirect(INVOICES_PATH))
    }

    /// A missing `id` is not an error: nothing is changed.
    pub fn update_invoice(&self, id: Uuid, form: &InvoiceForm) -> Result<Redirect, DomainError> {
        let input = validate_invoice_form(form)?;
        let changes = InvoiceChanges {
            amount_in_cents: amount_in_cents(input.amount)?,
            customer_id: input.customer_id,
            status: input.status,
        };

        let affected = self.repo.update(id, changes).map_err(|e| {
            log::error!("Error updating invoice {}: {}", id, e);
            DomainError::InvoiceUpdate
        })?;
        if affected == 0 {
            log::debug!("Update matched no invoice with id {}", id);
        } else {
            log::info!("Updated invoice {}", id);
        }

        self.revalidate();
        Ok(Redirect(INVOICES_PATH))
    }

    /// Idempotent: deleting an unknown id succeeds and still revalidates.
    pub fn delete_invoice(&self, id: Uuid) -> Result<(), DomainError> {
        let affected = self.repo.delete(id).map_err(|e| {
            log::error!("Error deleting invoice {}: {}", id, e);
            DomainError::InvoiceDeletion
        })?;
        if affected == 0 {
            log::debug!("Delete matched no invoice with id {}", id);
        } else {
            log::info!("Deleted invoice {}", id);
        }

        self.revalidate();
        Ok(())
    }

    pub fn get_invoice(&self, id: Uuid) -> Result<Invoice, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    /// `page` is 1-based; callers clamp paging before calling.
    pub fn list_invoices(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page, limit)
    }

    fn revalidate(&self) {
        let dropped = self.cache.revalidate(INVOICES_PATH);
        log::debug!("Revalidated {} ({} cached pages dropped)", INVOICES_PATH, dropped);
    }
}
