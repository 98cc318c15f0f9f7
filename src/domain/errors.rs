use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invoice not found")]
    NotFound,
    #[error("Invalid invoice fields: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Invoice creation failed")]
    InvoiceCreation,
    #[error("Invoice update failed")]
    InvoiceUpdate,
    #[error("Invoice deletion failed")]
    InvoiceDeletion,
    #[error("Internal error: {0}")]
    Internal(String),
}
