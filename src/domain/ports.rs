use uuid::Uuid;

use super::errors::DomainError;
use super::invoice::{Invoice, InvoiceChanges, ListResult, NewInvoice};

/// Each mutating method issues exactly one statement against the store.
pub trait InvoiceRepository: Send + Sync + 'static {
    /// Inserts a row and returns the id the store generated for it.
    fn insert(&self, invoice: NewInvoice) -> Result<Uuid, DomainError>;
    /// Returns the number of rows changed (0 when `id` does not exist).
    fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<usize, DomainError>;
    /// Returns the number of rows removed (0 when `id` does not exist).
    fn delete(&self, id: Uuid) -> Result<usize, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}
