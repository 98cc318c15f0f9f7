pub mod invoice_repo;
pub mod models;
pub mod page_cache;
